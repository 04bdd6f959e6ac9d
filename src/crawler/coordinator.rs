//! Monitor coordinator - orchestration of a single check
//!
//! One run is a strict sequence:
//! 1. Fetch the schedule page (with retries)
//! 2. Extract tournaments
//! 3. Load the previous snapshot
//! 4. Classify the change and notify
//! 5. Save the new snapshot
//!
//! Nothing is written before step 5, so a failed run leaves the previous
//! snapshot in place for the next one.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::Extractor;
use crate::diff::{classify, Scenario};
use crate::notify::{
    baseline_message, error_message, new_tournaments_message, Delivery, Notifier, WebhookNotifier,
};
use crate::state::{Snapshot, Tournament};
use crate::storage::{JsonFileStore, SnapshotStore};
use crate::MonitorError;

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Scenario the run resolved to
    pub scenario: Scenario,

    /// Tournaments in the previous snapshot (0 on a first run)
    pub previous_count: usize,

    /// Tournaments extracted in this run
    pub current_count: usize,

    /// Sink response, when a message was sent
    pub delivery: Option<Delivery>,
}

/// Main monitor structure
pub struct Monitor<S = JsonFileStore, N = WebhookNotifier> {
    config: Config,
    fetcher: Fetcher,
    extractor: Extractor,
    store: S,
    notifier: N,
}

impl Monitor {
    /// Creates a monitor with the JSON file store and webhook notifier
    ///
    /// The configuration is expected to be validated already; only the
    /// extraction schema is checked here, since it has to be compiled.
    pub fn new(config: Config) -> Result<Self, MonitorError> {
        let store = JsonFileStore::from_config(&config.state);
        let notifier = WebhookNotifier::from_config(&config.webhook);
        Self::with_parts(config, store, notifier)
    }
}

impl<S, N> Monitor<S, N>
where
    S: SnapshotStore,
    N: Notifier,
{
    /// Creates a monitor with a custom store and notifier
    pub fn with_parts(config: Config, store: S, notifier: N) -> Result<Self, MonitorError> {
        let fetcher = Fetcher::new(&config.source)?;
        let extractor = Extractor::new(&config.extract)?;

        Ok(Self {
            config,
            fetcher,
            extractor,
            store,
            notifier,
        })
    }

    /// Returns the snapshot store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one check and returns the first fatal error unchanged
    pub async fn run(&self) -> Result<RunReport, MonitorError> {
        let url = &self.config.source.url;
        tracing::info!("Checking tournament schedule at: {}", url);

        let body = self.fetcher.fetch(url).await?;
        let length = body.chars().count();
        if length < self.config.source.min_content_length {
            return Err(MonitorError::InvalidContent { length });
        }
        tracing::info!("Page fetched successfully. Content length: {} characters", length);

        let current = self.extractor.extract(&body);
        tracing::info!("Current tournament count: {}", current.len());

        let previous = self.store.load();
        let previous_count = previous.as_ref().map(Snapshot::len).unwrap_or(0);

        let scenario = classify(previous.as_ref(), &current);
        tracing::debug!(
            "Scenario: {} (notifies: {})",
            scenario.label(),
            scenario.notifies()
        );
        let delivery = self.handle_scenario(&scenario).await?;

        let snapshot = Snapshot::new(current);
        let current_count = snapshot.len();
        tracing::info!("Saving tournament data: {} tournaments", current_count);
        self.store.save(&snapshot)?;

        Ok(RunReport {
            scenario,
            previous_count,
            current_count,
            delivery,
        })
    }

    /// Runs one check; on failure sends a best-effort error notification
    ///
    /// A failure to deliver the error notification is logged and never
    /// replaces the original error.
    pub async fn run_and_report(&self) -> Result<RunReport, MonitorError> {
        match self.run().await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!("Check failed: {}", e);
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Sends the error notification for `error`, swallowing any failure
    pub async fn report_failure(&self, error: &MonitorError) {
        let message = error_message(&self.config.webhook.username, &error.to_string());

        match self.notifier.send(&message).await {
            Ok(delivery) if delivery.delivered => {
                tracing::info!("Error notification sent");
            }
            Ok(delivery) => {
                tracing::warn!(
                    "Error notification not accepted (status {})",
                    delivery.status
                );
            }
            Err(e) => {
                tracing::error!("Failed to send error notification: {}", e);
            }
        }
    }

    /// Logs the scenario and sends its message, if it has one
    async fn handle_scenario(&self, scenario: &Scenario) -> Result<Option<Delivery>, MonitorError> {
        let url = &self.config.source.url;

        match scenario {
            Scenario::Baseline { count } => {
                tracing::info!("First run with tournaments detected - establishing baseline");
                let message = baseline_message(&self.config.webhook.username, url, *count);
                Ok(Some(self.notifier.send(&message).await?))
            }
            Scenario::NewTournaments(added) => {
                tracing::info!("{} new tournament(s) detected", added.len());
                log_tournaments(added);
                let message = new_tournaments_message(url, added);
                Ok(Some(self.notifier.send(&message).await?))
            }
            Scenario::BothEmpty => {
                tracing::warn!(
                    "No tournaments detected in current or previous runs - check the extraction schema"
                );
                Ok(None)
            }
            Scenario::CountDecreased { previous, current } => {
                tracing::info!(
                    "Tournament count decreased from {} to {}",
                    previous,
                    current
                );
                Ok(None)
            }
            Scenario::Unchanged => {
                tracing::info!("No new tournaments detected");
                Ok(None)
            }
        }
    }
}

fn log_tournaments(tournaments: &[Tournament]) {
    for tournament in tournaments {
        tracing::info!("  New: {}", tournament);
    }
}

/// Runs a complete check with the default store and notifier
///
/// This is the main entry point used by the binary.
pub async fn run_check(config: Config) -> crate::Result<RunReport> {
    let monitor = Monitor::new(config)?;
    monitor.run_and_report().await
}
