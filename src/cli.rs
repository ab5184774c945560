// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option maps onto one field of `CrawlConfig` (see src/config.rs).
// clap only checks that values have the right type; range checks such as
// "workers must be positive" happen when the config is built, so that they
// produce a ConfigError and the documented exit code.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FrontierOrder, DEFAULT_USER_AGENT};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "site-imager",
    version,
    about = "Crawl one website and download every image its pages reference",
    long_about = "site-imager first discovers up to --max-pages HTML pages on the same \
                  site as ROOT_URL, then hands them to a pool of --workers downloaders \
                  that save each referenced image into --output-dir exactly once."
)]
pub struct Cli {
    /// Root URL to start crawling from (e.g., https://example.com)
    ///
    /// Only pages with the same scheme, host and port are followed.
    pub root_url: String,

    /// Maximum number of pages to visit during discovery
    #[arg(long, default_value_t = 10)]
    pub max_pages: usize,

    /// Number of concurrent image download workers
    #[arg(long, default_value_t = 2)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Directory images are written to (created if missing)
    #[arg(long, default_value = "images")]
    pub output_dir: PathBuf,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Order in which newly discovered pages are visited
    ///
    /// depth-first visits the most recently discovered link next;
    /// breadth-first visits links in the order they were found.
    #[arg(long, value_enum, default_value_t = FrontierOrder::DepthFirst)]
    pub order: FrontierOrder,

    /// Print the final summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
