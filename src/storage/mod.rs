//! Storage module for persisting the last observed schedule
//!
//! This module handles reading and writing the snapshot between runs:
//! - The `SnapshotStore` trait used by the monitor
//! - A JSON file backend with an accompanying count file

mod json;
mod traits;

pub use json::JsonFileStore;
pub use traits::{SnapshotStore, StorageError, StorageResult};

use crate::config::StateConfig;

/// Opens the snapshot store described by the configuration
pub fn open_store(config: &StateConfig) -> JsonFileStore {
    JsonFileStore::from_config(config)
}
