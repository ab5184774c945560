// src/page/testing.rs
// =============================================================================
// An in-memory website for exercising the crawl stages without a network.
//
// Routes are keyed by exact URL. A redirect route answers with the target's
// response and reports the target as the final URL, like reqwest does after
// following a Location header.
// =============================================================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{Fetched, Fetcher};
use crate::error::FetchError;

#[derive(Debug, Clone)]
enum Route {
    Ok(Fetched),
    Redirect(String),
    Err(FetchError),
}

/// Serves fixed responses by exact URL and counts every request.
/// Unknown URLs answer with a 404.
#[derive(Debug, Default)]
pub(crate) struct StaticSite {
    routes: HashMap<String, Route>,
    hits: Mutex<HashMap<String, usize>>,
}

impl StaticSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, html: &str) -> Self {
        self.resource(url, "text/html; charset=utf-8", html.as_bytes())
    }

    pub(crate) fn image(self, url: &str, bytes: &[u8]) -> Self {
        self.resource(url, "image/png", bytes)
    }

    pub(crate) fn resource(mut self, url: &str, content_type: &str, body: &[u8]) -> Self {
        let fetched = Fetched {
            body: body.to_vec(),
            content_type: Some(content_type.to_string()),
            final_url: Url::parse(url).unwrap(),
        };
        self.routes.insert(normalize(url), Route::Ok(fetched));
        self
    }

    pub(crate) fn redirect(mut self, from: &str, to: &str) -> Self {
        self.routes.insert(normalize(from), Route::Redirect(normalize(to)));
        self
    }

    pub(crate) fn error(mut self, url: &str, error: FetchError) -> Self {
        self.routes.insert(normalize(url), Route::Err(error));
        self
    }

    pub(crate) fn hits(&self, url: &str) -> usize {
        let hits = self.hits.lock().unwrap();
        hits.get(&normalize(url)).copied().unwrap_or(0)
    }

    pub(crate) fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}

#[async_trait]
impl Fetcher for StaticSite {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<Fetched, FetchError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        // Give other workers a chance to run between claim and result
        tokio::task::yield_now().await;

        let route = match self.routes.get(url.as_str()) {
            Some(Route::Redirect(target)) => self.routes.get(target),
            route => route,
        };
        match route {
            Some(Route::Ok(fetched)) => Ok(fetched.clone()),
            Some(Route::Err(error)) => Err(error.clone()),
            Some(Route::Redirect(_)) => Err(FetchError::Transport("redirect loop".into())),
            None => Err(FetchError::Status(404)),
        }
    }
}
