//! JSON file snapshot storage
//!
//! ## Layout
//!
//! ```text
//! tournaments.json       # { "lastChecked": ..., "tournaments": [...] }
//! tournament_count.txt   # decimal tournament count, for older consumers
//! ```

use crate::config::StateConfig;
use crate::state::Snapshot;
use crate::storage::traits::{SnapshotStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Snapshot store backed by a JSON file and a count file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    snapshot_path: PathBuf,
    count_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing to the given paths
    pub fn new(snapshot_path: impl Into<PathBuf>, count_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            count_path: count_path.into(),
        }
    }

    /// Creates a store from the `[state]` configuration section
    pub fn from_config(config: &StateConfig) -> Self {
        Self::new(&config.snapshot_path, &config.count_path)
    }

    /// Path of the JSON snapshot file
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Path of the count file
    pub fn count_path(&self) -> &Path {
        &self.count_path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<Snapshot> {
        let content = match fs::read_to_string(&self.snapshot_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No previous state at {} - treating as first run",
                    self.snapshot_path.display()
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read {}: {} - treating as first run",
                    self.snapshot_path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) => {
                tracing::info!(
                    "Previous tournament count: {} (last checked {})",
                    snapshot.len(),
                    snapshot.last_checked.to_rfc3339()
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not parse {}: {} - treating as first run",
                    self.snapshot_path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_replace(&self.snapshot_path, json.as_bytes())?;
        tracing::debug!("Saved {} tournaments to {}", snapshot.len(), self.snapshot_path.display());

        write_replace(&self.count_path, snapshot.len().to_string().as_bytes())?;
        tracing::debug!("Saved tournament count to {}", self.count_path.display());

        Ok(())
    }
}

/// Writes `contents` to a sibling temporary file, then renames it over `path`
fn write_replace(path: &Path, contents: &[u8]) -> StorageResult<()> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents).map_err(io_err)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    Ok(())
}
