//! Configuration module for Tournament-Watch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default except the source and webhook URLs, which may
//! also be supplied on the command line or through the environment.
//!
//! # Example
//!
//! ```no_run
//! use tournament_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("watch.toml")).unwrap();
//! println!("Watching: {}", config.source.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractionSchema, KeyRule, SourceConfig, StateConfig, WebhookConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config};
pub use validation::validate;
