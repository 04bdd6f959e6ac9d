//! Tournament record extracted from the schedule page

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tournament listed on the schedule page
///
/// `key` identifies the tournament across runs and is the only field used
/// when deciding whether a tournament is new. `name` is never empty for a
/// record produced by the extractor; `date` and `location` are free text and
/// may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
}

impl Tournament {
    /// Creates a tournament with only a key and a name
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            date: String::new(),
            location: String::new(),
        }
    }

    /// Sets the date text
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Sets the location text
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Returns the "date • location" detail line, or whichever half is present
    ///
    /// Returns `None` when both the date and the location are empty.
    pub fn details(&self) -> Option<String> {
        match (self.date.is_empty(), self.location.is_empty()) {
            (false, false) => Some(format!("{} • {}", self.date, self.location)),
            (false, true) => Some(self.date.clone()),
            (true, false) => Some(self.location.clone()),
            (true, true) => None,
        }
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details() {
            Some(details) => write!(f, "{} ({})", self.name, details),
            None => write!(f, "{}", self.name),
        }
    }
}
