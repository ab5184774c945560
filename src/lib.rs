// src/lib.rs
// =============================================================================
// site-imager: crawl one website, then download every image it references.
//
// Modules:
// - cli:    command-line arguments (clap)
// - config: the validated, immutable CrawlConfig
// - error:  the error taxonomy (config, fetch, parse, filesystem)
// - page:   fetching one URL and extracting links/images from HTML
// - crawl:  discovery, the download dispatcher and the worker pool
//
// The binary in src/main.rs wires these together; keeping them in a library
// lets the crawl stages be driven directly with any `Fetcher`.
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod page;
