//! State definitions for tracking tournaments across runs
//!
//! This module contains the extracted tournament record and the snapshot that is
//! persisted between runs.

mod snapshot;
mod tournament;

pub use snapshot::Snapshot;
pub use tournament::Tournament;
