// src/crawl/mod.rs
// =============================================================================
// This module runs a whole crawl.
//
// Phases:
// 1. Discovery (single task): walk the site and collect up to max_pages
//    same-origin HTML pages
// 2. Download (worker pool): every visited page is handed to exactly one
//    worker, which saves the page's images, each image URL at most once per run
//
// Phase 2 only starts after phase 1 has returned. All state lives in values
// created here and passed down explicitly; nothing is global.
// =============================================================================

mod discovery;
mod dispatcher;
mod stats;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::config::CrawlConfig;
use crate::error::FilesystemError;
use crate::page::Fetcher;

pub use discovery::discover;
pub use dispatcher::{Dispatcher, DownloadedImages};
pub use stats::{CrawlStats, Summary};
pub use worker::{run_pool, DownloadContext};

/// Cooperative cancellation shared by discovery and all workers.
///
/// Checked between units of work only; a request already in flight runs
/// until it completes or hits its timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs discovery and then the download pool.
///
/// The output directory is created up front; failing to create it is the
/// only error that aborts a run. Every other failure is counted in the
/// returned summary.
pub async fn run(
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    cancel: CancelFlag,
) -> Result<Summary, FilesystemError> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| FilesystemError::CreateDir {
            path: config.output_dir.clone(),
            source,
        })?;

    let stats = Arc::new(CrawlStats::default());

    info!(root = %config.root, max_pages = config.max_pages, "starting discovery");
    let pages = discover(config, fetcher.as_ref(), &cancel, &stats).await;
    info!(pages = pages.len(), "discovery finished");

    let context = DownloadContext {
        dispatcher: Arc::new(Dispatcher::new(pages)),
        downloaded: Arc::new(DownloadedImages::new()),
        fetcher,
        output_dir: config.output_dir.clone(),
        timeout: config.timeout,
        cancel: cancel.clone(),
        stats: Arc::clone(&stats),
    };

    info!(workers = config.workers, "starting image downloads");
    run_pool(context.clone(), config.workers).await;
    if context.downloaded.is_empty() {
        info!("no images were found on the visited pages");
    }
    info!(
        images = context.downloaded.len(),
        left = context.dispatcher.remaining(),
        "downloads finished"
    );

    let mut summary = stats.summary();
    summary.cancelled = cancel.is_cancelled();
    Ok(summary)
}
