//! Resource fetching for images, the cover and other remote inputs.
//!
//! The pipeline only depends on the [`Fetcher`] trait: "put the bytes
//! behind `source` at `destination`, or fail after bounded retries".
//! [`HttpFetcher`] is the default implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use reqwest::header::USER_AGENT;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::util::strip_prefix_ignore_case;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Simultaneous transfers allowed by default.
pub const DEFAULT_CONCURRENCY: usize = 5;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_2) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/34.0.1847.116 Safari/537.36";

/// Copies a resource to a local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `source` (a URL or local path) into `destination`.
    async fn fetch(&self, source: &str, destination: &Path) -> Result<()>;
}

/// Fixed-count, fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Default fetcher: HTTP(S) via reqwest, plus `file://`, `data:` and
/// plain local paths.
///
/// Transfers are bounded by a semaphore shared by all clones of the
/// fetcher, and each transfer is retried per its [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the concurrency ceiling (at least one transfer).
    pub fn with_concurrency(mut self, permits: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn try_fetch(&self, source: &str, destination: &Path) -> std::result::Result<(), BoxError> {
        if is_http_url(source) {
            let response = self
                .client
                .get(source)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .send()
                .await?
                .error_for_status()?;
            let bytes = response.bytes().await?;
            tokio::fs::write(destination, &bytes).await?;
        } else if let Some(rest) = strip_prefix_ignore_case(source, "data:") {
            tokio::fs::write(destination, decode_data_url(rest)?).await?;
        } else {
            tokio::fs::copy(local_path(source)?, destination).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, source: &str, destination: &Path) -> Result<()> {
        let _permit = self.limiter.acquire().await.map_err(|e| Error::Fetch {
            url: source.to_string(),
            attempts: 0,
            source: Box::new(e),
        })?;

        let attempts = self.retry.attempts.max(1);
        debug!(url = source, "fetching");
        let mut attempt = 1;
        loop {
            match self.try_fetch(source, destination).await {
                Ok(()) => {
                    debug!(url = source, dest = %destination.display(), "fetched");
                    return Ok(());
                }
                Err(err) if attempt >= attempts => {
                    return Err(Error::Fetch {
                        url: source.to_string(),
                        attempts,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(url = source, attempt, error = %err, "fetch failed, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn is_http_url(source: &str) -> bool {
    strip_prefix_ignore_case(source, "http://").is_some()
        || strip_prefix_ignore_case(source, "https://").is_some()
}

/// Resolve a `file://` URL or bare path to a filesystem path.
fn local_path(source: &str) -> std::result::Result<PathBuf, BoxError> {
    match strip_prefix_ignore_case(source, "file://") {
        Some(rest) => {
            // Drop an authority of "localhost"; other hosts are not reachable locally.
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            Ok(PathBuf::from(percent_decode_str(rest).decode_utf8()?.into_owned()))
        }
        None => Ok(PathBuf::from(source)),
    }
}

/// Decode the part of a `data:` URL after the scheme.
fn decode_data_url(rest: &str) -> std::result::Result<Vec<u8>, BoxError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or("data URL has no payload separator")?;
    if header
        .rsplit(';')
        .next()
        .is_some_and(|p| p.eq_ignore_ascii_case("base64"))
    {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(STANDARD.decode(compact)?)
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}
