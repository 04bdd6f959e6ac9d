use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure for Tournament-Watch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub extract: ExtractionSchema,
}

/// The schedule page and how to fetch it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of the schedule page
    pub url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-attempt request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Total number of fetch attempts
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled for each later retry (milliseconds)
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Bodies shorter than this are rejected as invalid
    #[serde(rename = "min-content-length")]
    pub min_content_length: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            user_agent: format!("tournament-watch/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30_000,
            max_attempts: 3,
            backoff_base_ms: 1_000,
            min_content_length: 100,
        }
    }
}

/// Webhook notification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook endpoint
    pub url: String,

    /// Display name attached to every message
    pub username: String,

    /// Request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: "Tournament Monitor".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Where the snapshot is persisted
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Path to the JSON snapshot file
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: PathBuf,

    /// Path to the plain-text tournament count file
    #[serde(rename = "count-path")]
    pub count_path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("tournaments.json"),
            count_path: PathBuf::from("tournament_count.txt"),
        }
    }
}

impl StateConfig {
    /// Resolves relative state paths against `dir`
    pub fn rebase(&mut self, dir: &Path) {
        if self.snapshot_path.is_relative() {
            self.snapshot_path = dir.join(&self.snapshot_path);
        }
        if self.count_path.is_relative() {
            self.count_path = dir.join(&self.count_path);
        }
    }
}

/// Declarative description of how tournament rows are found in the page
///
/// Every selector is a CSS selector. Field selectors are evaluated relative
/// to the row; the first match wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSchema {
    /// Selector matching one element per tournament
    pub row: String,

    /// Ordered fallback chain for the tournament key
    pub key: Vec<KeyRule>,

    /// Selector for the tournament name
    pub name: String,

    /// Selector for the date text
    pub date: String,

    /// Selector for the location text
    pub location: String,

    /// Prefix of the positional key used when the chain yields nothing
    #[serde(rename = "fallback-key-prefix")]
    pub fallback_key_prefix: String,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            row: "tr.vevent".to_string(),
            key: vec![
                KeyRule {
                    selector: Some("td.tinfo".to_string()),
                    attribute: "data-shortname".to_string(),
                },
                KeyRule {
                    selector: None,
                    attribute: "id".to_string(),
                },
            ],
            name: "td.tinfo span.summary a".to_string(),
            date: "td.dtstart span".to_string(),
            location: "td.tinfo a.address".to_string(),
            fallback_key_prefix: "entity".to_string(),
        }
    }
}

/// One step of the key fallback chain
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRule {
    /// Element within the row to read from; the row itself when absent
    #[serde(default)]
    pub selector: Option<String>,

    /// Attribute holding the key
    pub attribute: String,
}
