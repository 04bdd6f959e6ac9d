//! HTTP fetcher implementation
//!
//! This module handles retrieval of the schedule page, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Classifying failed attempts (bad status, timeout, transport)
//! - Exponential backoff between attempts

use crate::config::SourceConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors from a single fetch attempt, or the last one after retries run out
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    BadStatus { url: String, status: StatusCode },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Short machine-readable reason for logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadStatus { .. } => "bad-status",
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport",
            Self::Client(_) => "client",
        }
    }

    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Retry settings for [`Fetcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubled after each later one
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the failed attempt with the given 0-based index
    ///
    /// `backoff_base * 2^attempt`, saturating instead of overflowing.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1_000),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client timeout bounds a single attempt, body included.
fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page bodies with retry and exponential backoff
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher from the source configuration
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(FetchError::Client)?;
        let policy = RetryPolicy {
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        };
        Ok(Self { client, policy })
    }

    /// Returns the retry policy in use
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a URL, retrying failed attempts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Return body |
    /// | Any other status | Retry |
    /// | Timeout | Retry |
    /// | Connection error | Retry |
    ///
    /// Between attempt `i` and `i + 1` the fetcher sleeps
    /// `backoff_base * 2^i`. When every attempt fails the last error is
    /// returned.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            match fetch_once(&self.client, url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} failed ({}): {}",
                        attempt + 1,
                        self.policy.max_attempts,
                        e.reason(),
                        e
                    );

                    if attempt + 1 >= self.policy.max_attempts {
                        return Err(e);
                    }

                    let wait = self.policy.delay_after(attempt);
                    tracing::info!("Waiting {}ms before retry", wait.as_millis());
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Performs a single GET and returns the body when the status is exactly 200
async fn fetch_once(client: &Client, url: &str) -> Result<String, FetchError> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    tracing::debug!("HTTP status: {}", status);

    if status != StatusCode::OK {
        return Err(FetchError::BadStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    tracing::debug!("Fetched {} characters from {}", body.len(), url);
    Ok(body)
}
