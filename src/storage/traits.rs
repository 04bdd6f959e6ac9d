//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot storage backends and
//! associated error types.

use crate::state::Snapshot;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot storage implementations
///
/// A store holds at most one snapshot. Loading never fails: a store that
/// cannot produce a readable snapshot reports `None`, which the monitor treats
/// as a first run.
pub trait SnapshotStore {
    /// Loads the stored snapshot
    ///
    /// # Returns
    ///
    /// * `Some(Snapshot)` - A previous snapshot was found and parsed
    /// * `None` - Nothing stored, or the stored data was unreadable
    fn load(&self) -> Option<Snapshot>;

    /// Replaces the stored snapshot
    ///
    /// Either the whole snapshot is written or the previous one is left in place.
    fn save(&self, snapshot: &Snapshot) -> StorageResult<()>;
}
