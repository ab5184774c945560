// src/page/http.rs
// =============================================================================
// This module fetches one URL with one HTTP GET.
//
// Key functionality:
// - A single attempt per call: no retries, no backoff
// - A per-request timeout chosen by the caller
// - Redirects are followed the way reqwest does by default
// - Every failure mode is mapped onto a FetchError
//
// The crawl stages only see the `Fetcher` trait, so tests can drive them with
// an in-memory site instead of a real network.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::error::FetchError;

/// A successful response: the raw body, its declared media type and the URL
/// it was actually served from once redirects were followed.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub final_url: Url,
}

impl Fetched {
    /// True for `text/html` and `application/xhtml+xml`, with or without
    /// parameters such as `; charset=utf-8`.
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        })
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<Fetched, FetchError>;
}

/// The production fetcher, backed by a shared reqwest client.
//
// Client is cheap to clone (it's a reference counter internally) and pools
// connections, so one instance serves discovery and every worker.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<Fetched, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // The timeout also covers reading the body
        let body = response
            .bytes()
            .await
            .map_err(|e| categorize_error(e, timeout))?;

        Ok(Fetched {
            body: body.to_vec(),
            content_type,
            final_url,
        })
    }
}

// Categorizes the reqwest error kinds we care about
fn categorize_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    // Local test servers must not be routed through an environment proxy
    fn local_fetcher(user_agent: &str) -> HttpFetcher {
        let client = Client::builder()
            .user_agent(user_agent)
            .no_proxy()
            .build()
            .unwrap();
        HttpFetcher::with_client(client)
    }

    // Serves exactly one canned response on a random local port and hands
    // back the raw request text it received.
    async fn serve_once(response: impl Into<String>) -> (Url, JoinHandle<String>) {
        let response = response.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        let url = Url::parse(&format!("http://{addr}/page")).unwrap();
        (url, handle)
    }

    #[test]
    fn test_is_html() {
        let with = |ct: Option<&str>| Fetched {
            body: Vec::new(),
            content_type: ct.map(str::to_string),
            final_url: Url::parse("https://example.test/").unwrap(),
        };
        assert!(with(Some("text/html")).is_html());
        assert!(with(Some("Text/HTML; charset=UTF-8")).is_html());
        assert!(with(Some("application/xhtml+xml")).is_html());
        assert!(!with(Some("image/png")).is_html());
        assert!(!with(None).is_html());
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body_and_content_type() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
             Content-Length: 12\r\nConnection: close\r\n\r\n<p>hello</p>",
        )
        .await;

        let fetcher = local_fetcher("site-imager-test/0.0");
        let fetched = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(fetched.body, b"<p>hello</p>");
        assert!(fetched.is_html());
        assert_eq!(fetched.final_url, url);

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /page http/1.1"));
        assert!(request.contains("user-agent: site-imager-test/0.0"));
    }

    #[tokio::test]
    async fn test_fetch_reports_url_after_redirect() {
        let (landing, _other) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\
             Content-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let (url, _server) = serve_once(format!(
            "HTTP/1.1 302 Found\r\nLocation: {landing}\r\n\
             Content-Length: 0\r\nConnection: close\r\n\r\n"
        ))
        .await;

        let fetcher = local_fetcher("test");
        let fetched = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap();

        assert_eq!(fetched.final_url, landing);
        assert_ne!(fetched.final_url.origin(), url.origin());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let (url, _server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let fetcher = local_fetcher("test");
        let err = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and then never answer
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let url = Url::parse(&format!("http://{addr}/slow")).unwrap();
        let fetcher = local_fetcher("test");
        let err = fetcher
            .fetch(&url, Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        let fetcher = local_fetcher("test");
        let err = fetcher.fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)));
    }
}
