// src/crawl/stats.rs
// =============================================================================
// Run-wide counters, shared by discovery and every download worker.
//
// Each Event bumps one AtomicUsize; Summary is the snapshot printed (or
// serialized with --json) when the run ends.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

/// One countable outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PageVisited,
    PageScanned,
    ImageSaved,
    DuplicateImage,
    FetchFailed,
    ParseFailed,
    FilesystemFailed,
}

#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_visited: AtomicUsize,
    pages_scanned: AtomicUsize,
    images_saved: AtomicUsize,
    duplicate_images: AtomicUsize,
    fetch_errors: AtomicUsize,
    parse_errors: AtomicUsize,
    filesystem_errors: AtomicUsize,
}

impl CrawlStats {
    pub fn record(&self, event: Event) {
        let counter = match event {
            Event::PageVisited => &self.pages_visited,
            Event::PageScanned => &self.pages_scanned,
            Event::ImageSaved => &self.images_saved,
            Event::DuplicateImage => &self.duplicate_images,
            Event::FetchFailed => &self.fetch_errors,
            Event::ParseFailed => &self.parse_errors,
            Event::FilesystemFailed => &self.filesystem_errors,
        };
        // Counters are independent; nothing orders against them
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> Summary {
        let load = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        Summary {
            pages_visited: load(&self.pages_visited),
            pages_scanned: load(&self.pages_scanned),
            images_downloaded: load(&self.images_saved),
            duplicate_images: load(&self.duplicate_images),
            fetch_errors: load(&self.fetch_errors),
            parse_errors: load(&self.parse_errors),
            filesystem_errors: load(&self.filesystem_errors),
            cancelled: false,
        }
    }
}

/// The final report printed at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Pages discovery fetched and accepted as HTML
    pub pages_visited: usize,
    /// Pages a download worker fetched and scanned for images
    pub pages_scanned: usize,
    pub images_downloaded: usize,
    /// Image references skipped because the URL was already claimed
    pub duplicate_images: usize,
    pub fetch_errors: usize,
    pub parse_errors: usize,
    pub filesystem_errors: usize,
    pub cancelled: bool,
}

impl Summary {
    pub fn total_errors(&self) -> usize {
        self.fetch_errors + self.parse_errors + self.filesystem_errors
    }
}
