//! Sources of raw sheet text
//!
//! The dashboard only needs `fetch_text(url) -> text`, which may fail. The HTTP
//! implementation is the production one; the static and file sources back tests
//! and offline runs.

use crate::config::DashboardConfig;
use crate::{Error, Result};
use chrono::Utc;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Transport contract for fetching the sheet export
pub trait SheetSource: Send + Sync {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Append a cache-busting timestamp parameter to a URL
pub fn cache_busted_url(url: &str, param: &str, timestamp_millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{param}={timestamp_millis}")
}

/// Current wall-clock time in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Production source over HTTP GET
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: Arc<reqwest::Client>,
    timeout: Duration,
}

impl HttpSheetSource {
    /// Build a client with the configured user agent and timeout
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            timeout: config.request_timeout(),
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            timeout,
        }
    }
}

impl SheetSource for HttpSheetSource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            debug!("GET {}", url);

            let response = self
                .client
                .get(url)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        Error::fetch(url, format!("request timeout: {}", e))
                    } else if e.is_connect() {
                        Error::fetch(url, format!("connection failed: {}", e))
                    } else {
                        Error::fetch(url, format!("request failed: {}", e))
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::http_status(url, status.as_u16()));
            }

            response
                .text()
                .await
                .map_err(|e| Error::fetch(url, format!("failed to read response body: {}", e)))
        })
    }
}

/// Fixed response, for deterministic runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticSheetSource {
    /// Always return this text
    Text(String),
    /// Always fail with this transport message
    Failure(String),
}

impl StaticSheetSource {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

impl SheetSource for StaticSheetSource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            match self {
                Self::Text(text) => Ok(text.clone()),
                Self::Failure(message) => Err(Error::fetch(url, message.clone())),
            }
        })
    }
}

/// Reads a local CSV export, ignoring the requested URL
///
/// A read failure counts as a fetch failure so the dashboard keeps its data.
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SheetSource for FileSheetSource {
    fn fetch_text<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            debug!("Reading sheet from {}", self.path.display());
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| Error::fetch(self.path.display().to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cache_busted_url_appends_parameter() {
        assert_eq!(
            cache_busted_url("https://example.com/pub?output=csv", "t", 1_700_000_000_000),
            "https://example.com/pub?output=csv&t=1700000000000"
        );
        assert_eq!(
            cache_busted_url("https://example.com/sheet.csv", "t", 42),
            "https://example.com/sheet.csv?t=42"
        );
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_http_source_builds_from_config() {
        let config = DashboardConfig::default().with_request_timeout_ms(1_234);
        let source = HttpSheetSource::new(&config).unwrap();
        assert_eq!(source.timeout, Duration::from_millis(1_234));
    }

    #[tokio::test]
    async fn test_static_source() {
        let ok = StaticSheetSource::text("Ticker,Nombre\nAAPL,Apple");
        assert_eq!(
            ok.fetch_text("https://example.com").await.unwrap(),
            "Ticker,Nombre\nAAPL,Apple"
        );

        let failing = StaticSheetSource::failure("connection refused");
        let err = failing.fetch_text("https://example.com").await.unwrap_err();
        assert!(err.is_fetch_error());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Ticker,Nombre\nKO,Coca-Cola").unwrap();

        let source = FileSheetSource::new(file.path());
        let text = source.fetch_text("ignored").await.unwrap();
        assert!(text.contains("KO,Coca-Cola"));

        let missing = FileSheetSource::new("/definitely/not/here.csv");
        assert!(missing.fetch_text("ignored").await.unwrap_err().is_fetch_error());
    }
}
