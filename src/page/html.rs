// src/page/html.rs
// =============================================================================
// This module pulls URLs out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup is repaired rather than rejected
//
// Two extractors share one resolution routine:
// - extract_links:  <a href="...">  -> pages to crawl
// - extract_images: <img src="..."> -> images to download
//
// Both return absolute http(s) URLs without fragments. Filtering to the root's
// domain is the crawler's job, not ours.
// =============================================================================

use std::borrow::Cow;
use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use crate::error::ParseError;

// Turns a fetched body into text the HTML parser can work with.
//
// Decoding never fails: invalid UTF-8 sequences become U+FFFD and the
// returned ParseError only reports that a repair happened.
pub fn decode_html(body: &[u8]) -> (Cow<'_, str>, Option<ParseError>) {
    let error = std::str::from_utf8(body)
        .err()
        .map(|e| ParseError::Encoding(e.to_string()));
    (String::from_utf8_lossy(body), error)
}

// Extracts every hyperlink target on the page
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base = "https://example.com/page"
//   result = {"https://example.com/docs"}
pub fn extract_links(html: &str, base: &Url) -> HashSet<Url> {
    // Selector::parse only fails on invalid CSS; this one is a constant
    let selector = Selector::parse("a[href]").unwrap();
    collect_attr(html, base, &selector, "href")
}

// Extracts every image source on the page
pub fn extract_images(html: &str, base: &Url) -> HashSet<Url> {
    let selector = Selector::parse("img[src]").unwrap();
    collect_attr(html, base, &selector, "src")
}

fn collect_attr(html: &str, base: &Url, selector: &Selector, attr: &str) -> HashSet<Url> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .filter_map(|target| resolve_url(base, target))
        .collect()
}

// Resolves a possibly-relative reference to an absolute http(s) URL
//
// Examples:
//   base = "https://example.com/page/"
//   "/docs"             -> Some("https://example.com/docs")
//   "../other"          -> Some("https://example.com/other")
//   "//cdn.example.com" -> Some("https://cdn.example.com/")
//   "#top"              -> None (same page)
//   "mailto:a@b.c"      -> None (not HTTP)
pub(crate) fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    // join() also accepts absolute references, replacing the base entirely
    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);

    Some(url)
}
