//! Change detection between the stored snapshot and the current page
//!
//! Tournaments are compared by key only. A tournament whose name, date or
//! location changed under an unchanged key is not reported.

use crate::state::{Snapshot, Tournament};
use std::collections::HashSet;

/// Outcome of comparing the current tournaments with the previous snapshot
///
/// Variants are listed in resolution order; the first that applies wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// No usable previous snapshot and tournaments were found
    Baseline { count: usize },

    /// Tournaments whose keys were not in the previous snapshot
    NewTournaments(Vec<Tournament>),

    /// Neither the previous snapshot nor the page had any tournaments
    BothEmpty,

    /// Fewer tournaments than before and none of them new
    CountDecreased { previous: usize, current: usize },

    /// Nothing worth reporting
    Unchanged,
}

impl Scenario {
    /// Returns true if this scenario sends a notification
    pub fn notifies(&self) -> bool {
        matches!(self, Self::Baseline { .. } | Self::NewTournaments(_))
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline { .. } => "baseline",
            Self::NewTournaments(_) => "new-tournaments",
            Self::BothEmpty => "both-empty",
            Self::CountDecreased { .. } => "count-decreased",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Tournaments in `current` whose key does not appear in `previous`
///
/// Keeps the order of `current`.
pub fn new_tournaments<'a>(previous: &[Tournament], current: &'a [Tournament]) -> Vec<&'a Tournament> {
    let previous_keys: HashSet<&str> = previous.iter().map(|t| t.key.as_str()).collect();

    current
        .iter()
        .filter(|t| !previous_keys.contains(t.key.as_str()))
        .collect()
}

/// Decides which scenario applies
///
/// A missing snapshot is treated the same as an empty one.
pub fn classify(previous: Option<&Snapshot>, current: &[Tournament]) -> Scenario {
    let previous: &[Tournament] = previous.map(|s| s.tournaments.as_slice()).unwrap_or(&[]);

    if previous.is_empty() {
        return if current.is_empty() {
            Scenario::BothEmpty
        } else {
            Scenario::Baseline {
                count: current.len(),
            }
        };
    }

    let added = new_tournaments(previous, current);
    if !added.is_empty() {
        return Scenario::NewTournaments(added.into_iter().cloned().collect());
    }

    if current.len() < previous.len() {
        return Scenario::CountDecreased {
            previous: previous.len(),
            current: current.len(),
        };
    }

    Scenario::Unchanged
}
