// src/crawl/worker.rs
// =============================================================================
// Phase two: the image download worker pool.
//
// Each worker loops:
// 1. Check the cancel flag, then claim one page from the Dispatcher
// 2. Fetch the page and extract its <img> URLs
// 3. For every image, claim it in DownloadedImages (test-and-set)
// 4. Whoever wins the claim fetches the bytes and writes the file
//
// A failure only ever costs the page or image it happened on. Workers exit
// when the dispatcher is exhausted; the pool is done when all have exited.
//
// Rust concepts:
// - Arc: shared ownership of the dispatcher, image set and fetcher
// - tokio::spawn: one task per worker on the multi-threaded runtime
// - futures::future::join_all: wait for every worker handle
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::dispatcher::{Dispatcher, DownloadedImages};
use super::stats::{CrawlStats, Event};
use super::CancelFlag;
use crate::error::{FetchError, FilesystemError};
use crate::page::{decode_html, extract_images, Fetcher};

/// Everything a worker needs, built once per run and cloned into each task.
#[derive(Clone)]
pub struct DownloadContext {
    pub dispatcher: Arc<Dispatcher>,
    pub downloaded: Arc<DownloadedImages>,
    pub fetcher: Arc<dyn Fetcher>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub cancel: CancelFlag,
    pub stats: Arc<CrawlStats>,
}

#[derive(Debug, Error)]
enum SaveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

impl SaveError {
    fn event(&self) -> Event {
        match self {
            SaveError::Fetch(_) => Event::FetchFailed,
            SaveError::Filesystem(_) => Event::FilesystemFailed,
        }
    }
}

/// Starts `workers` tasks and waits until every one of them has returned.
pub async fn run_pool(context: DownloadContext, workers: usize) {
    let handles: Vec<_> = (1..=workers)
        .map(|id| tokio::spawn(run(id, context.clone())))
        .collect();

    for (id, result) in join_all(handles).await.into_iter().enumerate() {
        if let Err(e) = result {
            warn!(worker = id + 1, error = %e, "worker task failed");
        }
    }
}

/// One worker: claims pages until the dispatcher runs dry or the run is
/// cancelled.
pub async fn run(id: usize, context: DownloadContext) {
    debug!(worker = id, "worker started");

    loop {
        if context.cancel.is_cancelled() {
            info!(worker = id, "worker cancelled");
            break;
        }
        let Some(page) = context.dispatcher.take() else {
            break;
        };
        scan_page(id, &context, &page).await;
    }

    debug!(worker = id, "worker finished");
}

async fn scan_page(id: usize, context: &DownloadContext, page: &Url) {
    info!(worker = id, %page, "downloading images from page");

    let fetched = match context.fetcher.fetch(page, context.timeout).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(worker = id, %page, error = %e, "skipping page");
            context.stats.record(Event::FetchFailed);
            return;
        }
    };

    let (html, repaired) = decode_html(&fetched.body);
    if let Some(e) = repaired {
        warn!(worker = id, %page, error = %e, "parsing repaired page");
        context.stats.record(Event::ParseFailed);
    }
    context.stats.record(Event::PageScanned);

    let mut images: Vec<Url> = extract_images(&html, &fetched.final_url)
        .into_iter()
        .collect();
    images.sort();

    for image in images {
        if !context.downloaded.claim(&image) {
            info!(worker = id, %image, "already downloaded, skipping");
            context.stats.record(Event::DuplicateImage);
            continue;
        }

        match save_image(context, &image).await {
            Ok(path) => {
                info!(worker = id, %image, path = %path.display(), "downloaded image");
                context.stats.record(Event::ImageSaved);
            }
            Err(e) => {
                warn!(worker = id, %image, error = %e, "failed to download image");
                context.stats.record(e.event());
            }
        }
    }

    debug!(worker = id, %page, "finished page");
}

async fn save_image(context: &DownloadContext, image: &Url) -> Result<PathBuf, SaveError> {
    let path = image_path(&context.output_dir, image)?;
    let fetched = context.fetcher.fetch(image, context.timeout).await?;

    tokio::fs::write(&path, &fetched.body)
        .await
        .map_err(|source| FilesystemError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

// Two different URLs with the same basename write the same file; the last
// writer wins.
fn image_path(output_dir: &Path, image: &Url) -> Result<PathBuf, FilesystemError> {
    let name = file_name(image).ok_or_else(|| FilesystemError::NoFileName(image.to_string()))?;
    Ok(output_dir.join(name))
}

/// The last segment of the URL path, if it is non-empty.
///
/// `https://example.test/img/logo.png?v=2` -> `logo.png`
pub fn file_name(url: &Url) -> Option<&str> {
    url.path_segments()?.last().filter(|name| !name.is_empty())
}
