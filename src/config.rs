// src/config.rs
// =============================================================================
// Immutable run configuration.
//
// A CrawlConfig only exists if every field passed validation, so the crawl
// stages never re-check it. Nothing here touches the network or disk.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use url::Url;

use crate::cli::Cli;
use crate::error::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where newly discovered links go in the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierOrder {
    /// Push to the front: the most recently discovered link is visited next.
    #[default]
    DepthFirst,
    /// Push to the back: links are visited in discovery order.
    BreadthFirst,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub root: Url,
    pub max_pages: usize,
    pub workers: usize,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub order: FrontierOrder,
}

impl CrawlConfig {
    /// Validates the required settings. User agent and frontier order take
    /// their defaults and can be changed with the `with_*` builders.
    pub fn new(
        root_url: &str,
        max_pages: usize,
        workers: usize,
        timeout: Duration,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let root = parse_root(root_url)?;

        if max_pages == 0 {
            return Err(ConfigError::NonPositive("max pages"));
        }
        if workers == 0 {
            return Err(ConfigError::NonPositive("workers"));
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            root,
            max_pages,
            workers,
            timeout,
            output_dir: output_dir.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            order: FrontierOrder::default(),
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_order(mut self, order: FrontierOrder) -> Self {
        self.order = order;
        self
    }
}

impl TryFrom<&Cli> for CrawlConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        Ok(Self::new(
            &cli.root_url,
            cli.max_pages,
            cli.workers,
            Duration::from_secs(cli.timeout_secs),
            &cli.output_dir,
        )?
        .with_user_agent(&cli.user_agent)
        .with_order(cli.order))
    }
}

fn parse_root(root_url: &str) -> Result<Url, ConfigError> {
    let root = Url::parse(root_url).map_err(|e| ConfigError::InvalidRootUrl {
        url: root_url.to_string(),
        reason: e.to_string(),
    })?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(root.scheme().to_string()));
    }
    if root.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingHost(root_url.to_string()));
    }

    Ok(root)
}
