//! Tournament-Watch: a scheduled watcher for a tournament schedule page
//!
//! This crate fetches a single event-listing page, extracts the tournament rows
//! it contains, compares them against the snapshot stored by the previous run
//! and posts a webhook message when new tournaments appear.

pub mod config;
pub mod crawler;
pub mod diff;
pub mod notify;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Tournament-Watch operations
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Page content seems invalid. Length: {length}")]
    InvalidContent { length: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Notification error: {0}")]
    Notify(#[from] notify::NotifyError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Tournament-Watch operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Monitor;
pub use diff::Scenario;
pub use state::{Snapshot, Tournament};
