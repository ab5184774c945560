// src/crawl/discovery.rs
// =============================================================================
// Phase one: find the pages worth scanning for images.
//
// How it works:
// 1. Start with the root URL in the frontier
// 2. Pop a URL and fetch it
// 3. If it's an HTML page, mark it visited and extract its links
// 4. Push same-origin links that haven't been visited back into the frontier
// 5. Repeat until the frontier is empty or max_pages pages were visited
//
// Everything here runs on one task. The frontier is a plain VecDeque and
// HashSet with exactly one owner, so there is no locking.
//
// Ordering: with FrontierOrder::DepthFirst new links go to the FRONT of the
// queue and the newest link is visited next. BreadthFirst pushes to the back.
// When the page cap truncates the crawl, this decides which pages made it in.
// =============================================================================

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};
use url::Url;

use super::stats::{CrawlStats, Event};
use super::CancelFlag;
use crate::config::{CrawlConfig, FrontierOrder};
use crate::error::FetchError;
use crate::page::{decode_html, extract_links, Fetcher};

/// Pending and visited page URLs for one discovery run.
#[derive(Debug)]
pub(crate) struct Frontier {
    queue: VecDeque<Url>,
    visited: HashSet<Url>,
    max_pages: usize,
    order: FrontierOrder,
}

impl Frontier {
    pub(crate) fn new(root: Url, max_pages: usize, order: FrontierOrder) -> Self {
        Self {
            queue: VecDeque::from([root]),
            visited: HashSet::new(),
            max_pages,
            order,
        }
    }

    /// The next URL to fetch, or None once the cap is reached or the queue
    /// runs dry. URLs visited since they were queued are dropped here.
    pub(crate) fn next(&mut self) -> Option<Url> {
        if self.is_full() {
            return None;
        }
        while let Some(url) = self.queue.pop_front() {
            if !self.visited.contains(&url) {
                return Some(url);
            }
        }
        None
    }

    pub(crate) fn push(&mut self, url: Url) {
        if self.visited.contains(&url) {
            return;
        }
        match self.order {
            FrontierOrder::DepthFirst => self.queue.push_front(url),
            FrontierOrder::BreadthFirst => self.queue.push_back(url),
        }
    }

    /// Returns false if the URL was already visited.
    pub(crate) fn mark_visited(&mut self, url: Url) -> bool {
        self.visited.insert(url)
    }

    pub(crate) fn is_full(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub(crate) fn visited_len(&self) -> usize {
        self.visited.len()
    }

    #[cfg(test)]
    fn pending(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }

    pub(crate) fn into_visited(self) -> HashSet<Url> {
        self.visited
    }
}

// Same scheme, host and port
fn same_origin(root: &Url, url: &Url) -> bool {
    root.origin() == url.origin()
}

// Feeds the same-origin links of one page into the frontier
//
// Links come out of the extractor as a set; sorting them keeps the visit
// order reproducible between runs.
fn follow_links(frontier: &mut Frontier, root: &Url, page_url: &Url, html: &str) -> usize {
    let mut links: Vec<Url> = extract_links(html, page_url)
        .into_iter()
        .filter(|link| same_origin(root, link))
        .collect();
    links.sort();

    let count = links.len();
    for link in links {
        frontier.push(link);
    }
    count
}

/// Walks the site from `config.root` and returns every page visited.
///
/// A failed fetch, an off-site redirect or a non-HTML response never stops
/// the walk; it only costs that one URL. The returned set never holds more
/// than `config.max_pages` entries.
pub async fn discover(
    config: &CrawlConfig,
    fetcher: &dyn Fetcher,
    cancel: &CancelFlag,
    stats: &CrawlStats,
) -> HashSet<Url> {
    let mut frontier = Frontier::new(config.root.clone(), config.max_pages, config.order);

    loop {
        if cancel.is_cancelled() {
            info!("discovery cancelled");
            break;
        }
        let Some(url) = frontier.next() else {
            break;
        };

        let fetched = match fetcher.fetch(&url, config.timeout).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(%url, error = %e, "skipping page");
                stats.record(Event::FetchFailed);
                continue;
            }
        };

        // A same-site link can redirect anywhere; only the final location counts
        if !same_origin(&config.root, &fetched.final_url) {
            let e = FetchError::OffSite(fetched.final_url.to_string());
            warn!(%url, error = %e, "skipping page");
            stats.record(Event::FetchFailed);
            continue;
        }

        if !fetched.is_html() {
            let e = FetchError::UnexpectedContentType(
                fetched.content_type.unwrap_or_else(|| "none".to_string()),
            );
            debug!(%url, error = %e, "skipping page");
            stats.record(Event::FetchFailed);
            continue;
        }

        frontier.mark_visited(url.clone());
        stats.record(Event::PageVisited);
        info!(
            %url,
            visited = frontier.visited_len(),
            max = config.max_pages,
            "visited page"
        );

        let (html, repaired) = decode_html(&fetched.body);
        if let Some(e) = repaired {
            warn!(%url, error = %e, "parsing repaired page");
            stats.record(Event::ParseFailed);
        }

        // Relative links resolve against where the page was actually served
        let found = follow_links(&mut frontier, &config.root, &fetched.final_url, &html);
        debug!(%url, links = found, "queued same-site links");
    }

    frontier.into_visited()
}
