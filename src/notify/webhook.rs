//! Discord-style webhook notifier
//!
//! Posts `{"content": ..., "username": ...}` as JSON. The request is made once
//! with a timeout; there is no retry.

use crate::config::WebhookConfig;
use crate::notify::message::sanitize;
use crate::notify::traits::{Delivery, Notifier, NotifyError, NotifyResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

/// Sends messages to a webhook endpoint
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    username: String,
    client: Client,
    timeout: Duration,
}

impl WebhookNotifier {
    /// Creates a notifier for the given endpoint
    pub fn new(url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Creates a notifier from the `[webhook]` configuration section
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(&config.url, &config.username).with_timeout(Duration::from_millis(config.timeout_ms))
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> NotifyResult<Delivery> {
        let content = sanitize(message);
        let payload = WebhookPayload {
            content: &content,
            username: &self.username,
        };

        tracing::debug!("Posting {} character message to webhook", content.chars().count());

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    NotifyError::Request(e)
                }
            })?;

        let status = response.status();
        let delivered = status == StatusCode::OK || status == StatusCode::NO_CONTENT;

        if delivered {
            tracing::info!("Webhook notification sent (status {})", status.as_u16());
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                "Webhook answered with status {}: {}",
                status.as_u16(),
                body
            );
        }

        Ok(Delivery {
            status: status.as_u16(),
            delivered,
        })
    }
}
