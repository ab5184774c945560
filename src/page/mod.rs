// src/page/mod.rs
// =============================================================================
// Everything that deals with a single page or resource.
//
// Submodules:
// - http: fetches one URL (the `Fetcher` trait and its reqwest implementation)
// - html: extracts link and image URLs from an HTML body
//
// The crawl module builds the two-phase run on top of these.
// =============================================================================

mod html;
mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use html::{decode_html, extract_images, extract_links};
pub use http::{Fetched, Fetcher, HttpFetcher};
