//! Snapshot of the schedule as of the last successful check
//!
//! The snapshot is replaced wholesale on every successful run. Its serialized
//! form is the `tournaments.json` state file:
//!
//! ```json
//! { "lastChecked": "2025-01-01T00:00:00Z", "tournaments": [ ... ] }
//! ```

use crate::state::Tournament;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// All tournaments seen on the last successful check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the check that produced this snapshot ran
    ///
    /// Files written without it load with the Unix epoch.
    #[serde(default = "unknown_check_time")]
    pub last_checked: DateTime<Utc>,

    /// Tournaments in document order; a missing or `null` list is empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tournaments: Vec<Tournament>,
}

fn unknown_check_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Tournament>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Tournament>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// Creates a snapshot stamped with the current time
    pub fn new(tournaments: Vec<Tournament>) -> Self {
        Self {
            last_checked: Utc::now(),
            tournaments,
        }
    }

    /// Number of tournaments in the snapshot
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    /// Returns true if the snapshot holds no tournaments
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}
