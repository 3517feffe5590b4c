//! Remote quote source
//!
//! Fetches quote-like records from an HTTP endpoint and normalizes them
//! into `Quote`s. A fetch is a single attempt with a timeout; any failure is
//! reported as a `RemoteError` and the caller decides whether to try again.
//!
//! ## Normalization
//!
//! Each element of the JSON array returned by the endpoint becomes a quote:
//! - text: the `title` field, else the `text` field
//! - category: the `category` field, else the first word of `body`,
//!   else `"general"`
//!
//! Elements without usable text are skipped.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::Quote;

/// Category assigned when a remote item carries none
pub const DEFAULT_REMOTE_CATEGORY: &str = "general";

/// Errors from a remote fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport failure or timeout
    #[error("request failed: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("server responded with status {status}")]
    Server { status: u16 },

    /// Body is not a JSON array
    #[error("unexpected response body: {0}")]
    Parse(String),
}

/// A source of remote quotes
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch and normalize the remote collection (one attempt)
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, RemoteError>;

    /// Human-readable description (URL or name) for logs and status output
    fn describe(&self) -> String;
}

/// Remote source backed by an HTTP GET endpoint
#[derive(Debug, Clone)]
pub struct HttpRemoteSource {
    client: reqwest::Client,
    url: String,
    max_items: usize,
}

impl HttpRemoteSource {
    /// Create a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            max_items: 0,
        })
    }

    /// Create a source that uses a preconfigured client
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            max_items: 0,
        }
    }

    /// Build a source from configuration
    ///
    /// Returns `None` when sync is disabled or no URL is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, RemoteError> {
        let Some(url) = config.active_remote_url() else {
            return Ok(None);
        };

        Ok(Some(
            Self::new(url, config.fetch_timeout())?.with_max_items(config.sync_max_items),
        ))
    }

    /// Take at most `max_items` remote items per fetch (0 = no limit)
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, RemoteError> {
        debug!("Fetching remote quotes from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Server {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        parse_body(&body, self.max_items)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Remote source serving a fixed list, for tests and offline use
#[derive(Debug, Clone)]
pub struct StaticRemoteSource {
    result: Result<Vec<Quote>, RemoteError>,
}

impl StaticRemoteSource {
    /// Always return `quotes`
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { result: Ok(quotes) }
    }

    /// Always fail with `error`
    pub fn failing(error: RemoteError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl RemoteSource for StaticRemoteSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, RemoteError> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Parse a response body into quotes
///
/// The limit applies to raw items, before normalization.
pub fn parse_body(body: &str, max_items: usize) -> Result<Vec<Quote>, RemoteError> {
    let value: Value = serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(RemoteError::Parse("expected a JSON array".to_string()));
    };

    let limit = if max_items == 0 { items.len() } else { max_items };
    Ok(normalize_items(&items[..limit.min(items.len())]))
}

/// Normalize raw remote items into quotes, skipping unusable ones
pub fn normalize_items(items: &[Value]) -> Vec<Quote> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(fields) => normalize_item(fields),
            _ => None,
        })
        .collect()
}

fn normalize_item(fields: &Map<String, Value>) -> Option<Quote> {
    let text = non_empty_str(fields, "title").or_else(|| non_empty_str(fields, "text"))?;

    let category = non_empty_str(fields, "category")
        .or_else(|| {
            non_empty_str(fields, "body")
                .and_then(|body| body.split_whitespace().next().map(str::to_string))
        })
        .unwrap_or_else(|| DEFAULT_REMOTE_CATEGORY.to_string());

    Some(Quote::new(text, category))
}

fn non_empty_str(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response, returning the URL to hit
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/posts", addr)
    }

    /// HTTP source that talks to loopback directly, ignoring proxy settings
    fn local_source(url: String, timeout: Duration) -> HttpRemoteSource {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        HttpRemoteSource::with_client(client, url)
    }

    #[test]
    fn test_normalize_post_shape() {
        let items = vec![json!({
            "userId": 1,
            "id": 1,
            "title": "sunt aut facere",
            "body": "quia et suscipit\nsuscipit recusandae"
        })];

        assert_eq!(
            normalize_items(&items),
            vec![Quote::new("sunt aut facere", "quia")]
        );
    }

    #[test]
    fn test_normalize_fallbacks() {
        let items = vec![
            json!({"text": "From text field", "category": "wisdom"}),
            json!({"title": "No body"}),
            json!({"title": "Blank body", "body": "   "}),
            json!({"title": "Explicit wins", "category": "humor", "body": "ignored words"}),
        ];

        let quotes = normalize_items(&items);
        assert_eq!(
            quotes,
            vec![
                Quote::new("From text field", "wisdom"),
                Quote::new("No body", "general"),
                Quote::new("Blank body", "general"),
                Quote::new("Explicit wins", "humor"),
            ]
        );
    }

    #[test]
    fn test_normalize_skips_unusable_items() {
        let items = vec![
            json!({"body": "no title"}),
            json!({"title": ""}),
            json!({"title": 42}),
            json!("string item"),
            json!({"title": "Kept"}),
        ];

        assert_eq!(normalize_items(&items), vec![Quote::new("Kept", "general")]);
    }

    #[test]
    fn test_parse_body_limit() {
        let body = json!([
            {"title": "one"},
            {"title": "two"},
            {"title": "three"}
        ])
        .to_string();

        assert_eq!(parse_body(&body, 2).unwrap().len(), 2);
        assert_eq!(parse_body(&body, 0).unwrap().len(), 3);
        assert_eq!(parse_body(&body, 10).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_body_rejects_non_array() {
        assert!(matches!(
            parse_body(r#"{"title": "x"}"#, 0),
            Err(RemoteError::Parse(_))
        ));
        assert!(matches!(
            parse_body("<html>", 0),
            Err(RemoteError::Parse(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        let source = HttpRemoteSource::from_config(&config).unwrap().unwrap();
        assert_eq!(source.url(), crate::config::DEFAULT_REMOTE_URL);

        config.sync_enabled = false;
        assert!(HttpRemoteSource::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let body = json!([
            {"title": "Remote one", "body": "alpha beta"},
            {"title": "Remote two", "body": "gamma"}
        ])
        .to_string();
        let url = serve_once("200 OK", body).await;

        let source = local_source(url, Duration::from_secs(5));
        let quotes = source.fetch_quotes().await.unwrap();

        assert_eq!(
            quotes,
            vec![
                Quote::new("Remote one", "alpha"),
                Quote::new("Remote two", "gamma"),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_fetch_server_error() {
        let url = serve_once("503 Service Unavailable", "oops".to_string()).await;

        let source = local_source(url, Duration::from_secs(5));
        let err = source.fetch_quotes().await.unwrap_err();
        assert_eq!(err, RemoteError::Server { status: 503 });
    }

    #[tokio::test]
    async fn test_http_fetch_unreachable() {
        // Grab a free port, then close it so the connection is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = local_source(format!("http://{}/posts", addr), Duration::from_secs(5));
        let err = source.fetch_quotes().await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[tokio::test]
    async fn test_http_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept and hold the connection without ever answering
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let source = local_source(format!("http://{}/posts", addr), Duration::from_millis(200));
        let err = source.fetch_quotes().await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticRemoteSource::new(vec![Quote::new("A", "x")]);
        assert_eq!(source.fetch_quotes().await.unwrap().len(), 1);

        let failing = StaticRemoteSource::failing(RemoteError::Server { status: 500 });
        assert!(failing.fetch_quotes().await.is_err());
    }
}
