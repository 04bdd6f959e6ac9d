//! Notifier trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Errors that prevent a message from reaching the sink at all
///
/// An HTTP response with an unexpected status is not an error; it is
/// reported through [`Delivery`].
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// What the sink answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// HTTP status returned by the sink
    pub status: u16,

    /// Whether the status counts as delivered (200 or 204)
    pub delivered: bool,
}

/// Destination for notification messages
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one plain-text message
    ///
    /// Implementations are responsible for sanitizing and truncating the text
    /// to whatever the sink accepts.
    async fn send(&self, message: &str) -> NotifyResult<Delivery>;
}
