//! Integration tests for the monitor
//!
//! These tests use wiremock to serve the schedule page and receive webhook
//! posts, and run full checks end-to-end against a temporary state directory.

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tournament_watch::config::Config;
use tournament_watch::crawler::{FetchError, Monitor};
use tournament_watch::storage::{JsonFileStore, SnapshotStore};
use tournament_watch::{MonitorError, Scenario, Snapshot, Tournament};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHEDULE_PATH: &str = "/schedule";
const WEBHOOK_PATH: &str = "/api/webhooks/42/token";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, state_dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.url = format!("{}{}", server.uri(), SCHEDULE_PATH);
    config.source.timeout_ms = 2_000;
    config.source.backoff_base_ms = 1; // Very short for testing
    config.webhook.url = format!("{}{}", server.uri(), WEBHOOK_PATH);
    config.webhook.username = "Test Monitor".to_string();
    config.webhook.timeout_ms = 2_000;
    config.state.rebase(state_dir);
    config
}

/// Renders a schedule row in the hCalendar layout the default schema expects
fn row(key: &str, name: &str, date: &str, location: &str) -> String {
    format!(
        r#"<tr class="vevent" id="row-{key}">
            <td class="dtstart"><span>{date}</span></td>
            <td class="tinfo" data-shortname="{key}">
                <span class="summary"><a href="/t/{key}">{name}</a></span>
                <a class="address" href="/map/{key}">{location}</a>
            </td>
        </tr>"#
    )
}

fn schedule_page(rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Tournament Schedule</title></head>
<body>
<h1>Upcoming tournaments</h1>
<table class="schedule">
<tr><th>Date</th><th>Tournament</th></tr>
{}
</table>
</body></html>"#,
        rows.concat()
    )
}

async fn mount_page(server: &MockServer, html: String) {
    Mock::given(method("GET"))
        .and(path(SCHEDULE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_webhook(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Webhook payloads received so far, parsed as JSON
async fn webhook_payloads(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == WEBHOOK_PATH)
        .map(|request| serde_json::from_slice(&request.body).expect("webhook body is JSON"))
        .collect()
}

async fn page_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == SCHEDULE_PATH)
        .count()
}

fn content(payload: &serde_json::Value) -> &str {
    payload["content"].as_str().expect("content is a string")
}

#[tokio::test]
async fn test_baseline_then_steady_state() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    mount_webhook(&server, 204).await;

    let config = create_test_config(&server, dir.path());
    let monitor = Monitor::new(config).expect("Failed to create monitor");

    // First run establishes the baseline
    let report = monitor.run_and_report().await.expect("First run failed");
    assert_eq!(report.scenario, Scenario::Baseline { count: 1 });
    assert_eq!(report.previous_count, 0);
    assert!(report.delivery.unwrap().delivered);

    let payloads = webhook_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    assert!(content(&payloads[0]).contains("Baseline tournament count: 1"));
    assert_eq!(payloads[0]["username"], "Test Monitor");

    let first = monitor.store().load().expect("Snapshot saved");
    assert_eq!(first.tournaments, vec![Tournament::new("a", "Open A")]);

    // Second run with identical content sends nothing
    let report = monitor.run_and_report().await.expect("Second run failed");
    assert_eq!(report.scenario, Scenario::Unchanged);
    assert!(report.delivery.is_none());
    assert_eq!(webhook_payloads(&server).await.len(), 1);

    let second = monitor.store().load().expect("Snapshot saved");
    assert_eq!(second.tournaments, first.tournaments);
    assert!(second.last_checked >= first.last_checked);
}

#[tokio::test]
async fn test_new_tournament_is_announced() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    let store = JsonFileStore::from_config(&config.state);
    store
        .save(&Snapshot::new(vec![Tournament::new("a", "Open A")]))
        .unwrap();

    mount_page(
        &server,
        schedule_page(&[
            row("a", "Open A", "", ""),
            row("b", "Open B", "2025-01-01", "City"),
        ]),
    )
    .await;
    mount_webhook(&server, 200).await;

    let monitor = Monitor::new(config.clone()).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    assert!(matches!(report.scenario, Scenario::NewTournaments(ref added) if added.len() == 1));
    assert!(report.scenario.notifies());
    assert!(report.delivery.unwrap().delivered);

    let payloads = webhook_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    let text = content(&payloads[0]);
    assert!(text.contains("1 New Tournament(s) Added!"));
    assert!(text.contains("**Open B**"));
    assert!(text.contains("2025-01-01 • City"));
    assert!(text.ends_with(&format!("<{}>", config.source.url)));

    let saved = store.load().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(
        std::fs::read_to_string(&config.state.count_path).unwrap(),
        "2"
    );
}

#[tokio::test]
async fn test_both_empty_sends_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, schedule_page(&[])).await;
    mount_webhook(&server, 204).await;

    let config = create_test_config(&server, dir.path());
    let monitor = Monitor::new(config.clone()).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    assert_eq!(report.scenario, Scenario::BothEmpty);
    assert!(!report.scenario.notifies());
    assert!(report.delivery.is_none());
    assert!(webhook_payloads(&server).await.is_empty());

    // The snapshot is still written so lastChecked moves forward
    assert!(monitor.store().load().unwrap().is_empty());
    assert_eq!(
        std::fs::read_to_string(&config.state.count_path).unwrap(),
        "0"
    );
}

#[tokio::test]
async fn test_count_decrease_sends_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    JsonFileStore::from_config(&config.state)
        .save(&Snapshot::new(vec![
            Tournament::new("a", "Open A"),
            Tournament::new("b", "Open B"),
        ]))
        .unwrap();

    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    mount_webhook(&server, 204).await;

    let monitor = Monitor::new(config).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    assert_eq!(
        report.scenario,
        Scenario::CountDecreased {
            previous: 2,
            current: 1
        }
    );
    assert!(webhook_payloads(&server).await.is_empty());
    assert_eq!(monitor.store().load().unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_state_is_treated_as_first_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());
    std::fs::write(&config.state.snapshot_path, "{ definitely not json").unwrap();

    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    mount_webhook(&server, 204).await;

    let monitor = Monitor::new(config).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    assert_eq!(report.scenario, Scenario::Baseline { count: 1 });
    assert_eq!(monitor.store().load().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_retries_until_success() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SCHEDULE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    mount_webhook(&server, 204).await;

    let monitor = Monitor::new(create_test_config(&server, dir.path())).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    assert_eq!(report.scenario, Scenario::Baseline { count: 1 });
    assert_eq!(page_requests(&server).await, 3);
}

#[tokio::test]
async fn test_fetch_exhaustion_reports_error_and_keeps_state() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SCHEDULE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_webhook(&server, 204).await;

    let config = create_test_config(&server, dir.path());
    let monitor = Monitor::new(config.clone()).unwrap();
    let result = monitor.run_and_report().await;

    match result {
        Err(MonitorError::Fetch(FetchError::BadStatus { status, .. })) => {
            assert_eq!(status.as_u16(), 503)
        }
        other => panic!("Expected bad status error, got {:?}", other),
    }
    assert_eq!(page_requests(&server).await, 3);

    let payloads = webhook_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    assert!(content(&payloads[0]).contains("Test Monitor Error"));
    assert!(content(&payloads[0]).contains("503"));

    assert!(!config.state.snapshot_path.exists());
    assert!(!config.state.count_path.exists());
}

#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SCHEDULE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(schedule_page(&[]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    mount_webhook(&server, 204).await;

    let mut config = create_test_config(&server, dir.path());
    config.source.timeout_ms = 200;
    config.source.max_attempts = 1;

    let monitor = Monitor::new(config).unwrap();
    let result = monitor.run().await;

    assert!(matches!(
        result,
        Err(MonitorError::Fetch(FetchError::Timeout { .. }))
    ));
}

#[tokio::test]
async fn test_short_page_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "<html></html>".to_string()).await;
    mount_webhook(&server, 204).await;

    let monitor = Monitor::new(create_test_config(&server, dir.path())).unwrap();
    let result = monitor.run_and_report().await;

    assert!(matches!(
        result,
        Err(MonitorError::InvalidContent { length: 13 })
    ));
    assert_eq!(webhook_payloads(&server).await.len(), 1);
}

#[tokio::test]
async fn test_rejected_webhook_status_is_not_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    mount_webhook(&server, 400).await;

    let monitor = Monitor::new(create_test_config(&server, dir.path())).unwrap();
    let report = monitor.run_and_report().await.expect("Run failed");

    let delivery = report.delivery.unwrap();
    assert_eq!(delivery.status, 400);
    assert!(!delivery.delivered);
    assert!(monitor.store().load().is_some());
}

#[tokio::test]
async fn test_webhook_timeout_is_fatal_and_state_untouched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, schedule_page(&[row("a", "Open A", "", "")])).await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, dir.path());
    config.webhook.timeout_ms = 200;

    let monitor = Monitor::new(config.clone()).unwrap();
    let result = monitor.run_and_report().await;

    // The failed error notification does not replace the original error
    assert!(matches!(result, Err(MonitorError::Notify(_))));
    assert!(!config.state.snapshot_path.exists());
}

#[tokio::test]
async fn test_long_message_is_truncated() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, dir.path());

    JsonFileStore::from_config(&config.state)
        .save(&Snapshot::new(vec![Tournament::new("seed", "Seed Open")]))
        .unwrap();

    let rows: Vec<String> = (0..60)
        .map(|i| {
            row(
                &format!("t{}", i),
                &format!("Grand Championship Series Qualifier Number {}", i),
                "2025-06-01",
                "Community Sports Complex",
            )
        })
        .collect();
    mount_page(&server, schedule_page(&rows)).await;
    mount_webhook(&server, 204).await;

    let monitor = Monitor::new(config).unwrap();
    monitor.run_and_report().await.expect("Run failed");

    let payloads = webhook_payloads(&server).await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(content(&payloads[0]).chars().count(), 2000);
}
