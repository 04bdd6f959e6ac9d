//! Crawler module for fetching and reading the schedule page
//!
//! This module contains the core monitoring logic, including:
//! - HTTP fetching with retry logic
//! - Schema-driven tournament extraction
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_check, Monitor, RunReport};
pub use fetcher::{FetchError, Fetcher, RetryPolicy};
pub use parser::{extract_tournaments, CompiledSchema, Extractor};
