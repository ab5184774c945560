// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing) and parse command-line arguments (clap)
// 2. Validate them into a CrawlConfig
// 3. Install a Ctrl-C handler that flips the shared cancel flag
// 4. Run discovery + downloads and print the summary
// 5. Exit with proper code (0 = run completed, 2 = could not start or
//    could not create the output directory)
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_imager::cli::Cli;
use site_imager::config::CrawlConfig;
use site_imager::crawl::{self, CancelFlag, Summary};
use site_imager::page::HttpFetcher;

#[tokio::main]
async fn main() {
    // Progress goes to stderr through tracing; RUST_LOG overrides the default
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_imager=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // Config errors and an unusable output directory end up here
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = CrawlConfig::try_from(&cli)?;

    let fetcher = HttpFetcher::new(&config.user_agent).context("cannot build HTTP client")?;

    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing in-flight requests");
            on_signal.cancel();
        }
    });

    println!("🔍 Crawling {}", config.root);
    println!(
        "📊 Up to {} page(s), {} worker(s), saving to {}",
        config.max_pages,
        config.workers,
        config.output_dir.display()
    );

    let summary = crawl::run(&config, Arc::new(fetcher), cancel).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &Summary) {
    println!();
    if summary.cancelled {
        println!("⚠️  Run was interrupted; counts cover the work finished so far");
    }
    println!("📊 Summary:");
    println!("   📄 Pages visited:      {}", summary.pages_visited);
    println!("   🔎 Pages scanned:      {}", summary.pages_scanned);
    println!("   🖼️  Images downloaded:  {}", summary.images_downloaded);
    println!("   ♻️  Duplicates skipped: {}", summary.duplicate_images);
    println!("   🌐 Fetch errors:       {}", summary.fetch_errors);
    println!("   🧩 Parse errors:       {}", summary.parse_errors);
    println!("   💾 Filesystem errors:  {}", summary.filesystem_errors);
}
