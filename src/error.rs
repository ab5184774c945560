// src/error.rs
// =============================================================================
// The error taxonomy for a crawl run.
//
// Only two of these are ever fatal:
// - ConfigError: the run never starts
// - FilesystemError::CreateDir: the output directory is unusable
//
// Everything else is recovered at the unit of work that produced it (one page
// fetch, one image fetch, one file write) and only shows up in the summary.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Invalid configuration detected before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid root URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },

    #[error("unsupported scheme '{0}': only http and https can be crawled")]
    UnsupportedScheme(String),

    #[error("root URL has no host: {0}")]
    MissingHost(String),

    #[error("{0} must be a positive integer")]
    NonPositive(&'static str),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Failure of a single GET. Never propagated past the page or image it
/// belongs to.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("unexpected content type '{0}'")]
    UnexpectedContentType(String),

    #[error("redirected off site to {0}")]
    OffSite(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// A page body that needed repair before it could be parsed. The repaired
/// text is still used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("body is not valid UTF-8, invalid bytes were replaced: {0}")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image URL has no file name in its path: {0}")]
    NoFileName(String),
}
