//! Tournament-Watch main entry point
//!
//! This is the command-line interface for the tournament schedule watcher.
//! Intended to be run from a scheduler: every invocation performs one check.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tournament_watch::config::{compute_config_hash, parse_config, validate, Config};
use tournament_watch::crawler::run_check;
use tournament_watch::storage::{open_store, SnapshotStore};
use tracing_subscriber::EnvFilter;

/// Tournament-Watch: notify a webhook when new tournaments are scheduled
///
/// Fetches the schedule page, compares its tournaments with the ones seen on
/// the previous run and posts a message for every newly listed tournament.
#[derive(Parser, Debug)]
#[command(name = "tournament-watch")]
#[command(version)]
#[command(about = "Notify a webhook when new tournaments are scheduled", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Schedule page URL (overrides source.url)
    #[arg(long, env = "TARGET_URL", value_name = "URL")]
    target_url: Option<String>,

    /// Webhook URL (overrides webhook.url)
    #[arg(long, env = "DISCORD_WEBHOOK_URL", value_name = "URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Directory for relative state file paths
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be checked without any I/O
    #[arg(long, conflicts_with = "show_state")]
    dry_run: bool,

    /// Show the stored snapshot and exit
    #[arg(long, conflicts_with = "dry_run")]
    show_state: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.show_state {
        handle_show_state(&config)
    } else {
        handle_check(config).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tournament_watch=info,warn"),
            1 => EnvFilter::new("tournament_watch=debug,info"),
            2 => EnvFilter::new("tournament_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = parse_config(path)?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(url) = &cli.target_url {
        config.source.url = url.clone();
    }
    if let Some(url) = &cli.webhook_url {
        config.webhook.url = url.clone();
    }
    if let Some(dir) = &cli.state_dir {
        config.state.rebase(dir);
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Tournament-Watch Dry Run ===\n");

    println!("Source:");
    println!("  URL: {}", config.source.url);
    println!("  User agent: {}", config.source.user_agent);
    println!("  Timeout: {}ms", config.source.timeout_ms);
    println!(
        "  Attempts: {} (backoff base {}ms)",
        config.source.max_attempts, config.source.backoff_base_ms
    );
    println!("  Minimum content length: {}", config.source.min_content_length);

    println!("\nWebhook:");
    println!("  Username: {}", config.webhook.username);
    println!("  Timeout: {}ms", config.webhook.timeout_ms);

    println!("\nState:");
    println!("  Snapshot: {}", config.state.snapshot_path.display());
    println!("  Count: {}", config.state.count_path.display());

    println!("\nExtraction schema:");
    println!("  Row: {}", config.extract.row);
    println!("  Name: {}", config.extract.name);
    println!("  Date: {}", config.extract.date);
    println!("  Location: {}", config.extract.location);
    println!("  Key chain:");
    for rule in &config.extract.key {
        match &rule.selector {
            Some(selector) => println!("    * {} [{}]", selector, rule.attribute),
            None => println!("    * <row> [{}]", rule.attribute),
        }
    }
    println!("    * {}-<index>", config.extract.fallback_key_prefix);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --show-state mode: prints the stored snapshot
fn handle_show_state(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.state);

    match store.load() {
        Some(snapshot) => {
            println!("Last checked: {}", snapshot.last_checked.to_rfc3339());
            println!("Tournaments: {}\n", snapshot.len());
            for tournament in &snapshot.tournaments {
                println!("  [{}] {}", tournament.key, tournament);
            }
        }
        None => {
            println!(
                "No readable snapshot at {}",
                config.state.snapshot_path.display()
            );
        }
    }

    Ok(())
}

/// Handles the main check
async fn handle_check(config: Config) -> anyhow::Result<()> {
    let report = run_check(config).await?;

    tracing::info!(
        "Check completed: {} ({} -> {} tournaments)",
        report.scenario.label(),
        report.previous_count,
        report.current_count
    );

    Ok(())
}
