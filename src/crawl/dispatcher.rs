// src/crawl/dispatcher.rs
// =============================================================================
// The two pieces of state shared by every download worker.
//
// - Dispatcher:       the pages still waiting to be scanned for images
// - DownloadedImages: every image URL some worker has already claimed
//
// Each one sits behind its own std Mutex. A lock is taken for exactly one
// pop or one insert and released before the caller awaits anything, so no
// network or disk I/O ever happens while a lock is held.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

// A panicking worker can't leave a Vec or HashSet half-updated by a single
// pop or insert, so a poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands each page to exactly one worker.
#[derive(Debug, Default)]
pub struct Dispatcher {
    pending: Mutex<Vec<Url>>,
}

impl Dispatcher {
    pub fn new(pages: impl IntoIterator<Item = Url>) -> Self {
        Self {
            pending: Mutex::new(pages.into_iter().collect()),
        }
    }

    /// Removes and returns one page, or None once every page was claimed.
    pub fn take(&self) -> Option<Url> {
        lock(&self.pending).pop()
    }

    pub fn is_exhausted(&self) -> bool {
        lock(&self.pending).is_empty()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// The set of image URLs already claimed for download.
#[derive(Debug, Default)]
pub struct DownloadedImages {
    seen: Mutex<HashSet<Url>>,
}

impl DownloadedImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomic test-and-set: true for exactly one caller per URL over the
    /// lifetime of the set, however many workers race on it.
    pub fn claim(&self, url: &Url) -> bool {
        lock(&self.seen).insert(url.clone())
    }

    #[cfg(test)]
    fn contains(&self, url: &Url) -> bool {
        lock(&self.seen).contains(url)
    }

    pub fn len(&self) -> usize {
        lock(&self.seen).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.seen).is_empty()
    }
}
