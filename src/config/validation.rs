use crate::config::types::{Config, ExtractionSchema, SourceConfig, StateConfig, WebhookConfig};
use crate::crawler::CompiledSchema;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network or file I/O so that a broken deployment fails fast.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_source_config(&config.source)?;
    validate_webhook_config(&config.webhook)?;
    validate_state_config(&config.state)?;
    validate_extraction_schema(&config.extract)?;
    Ok(())
}

/// Validates the schedule page settings
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.url.is_empty() {
        return Err(ConfigError::Validation(
            "source.url must be set (or TARGET_URL)".to_string(),
        ));
    }

    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source.url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "source.url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "source.max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "source.timeout-ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates webhook settings
///
/// The endpoint must be a Discord-style webhook: HTTPS with an
/// `/api/webhooks/` path.
fn validate_webhook_config(config: &WebhookConfig) -> Result<(), ConfigError> {
    if config.url.is_empty() {
        return Err(ConfigError::Validation(
            "webhook.url must be set (or DISCORD_WEBHOOK_URL)".to_string(),
        ));
    }

    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webhook.url: {}", e)))?;

    if url.scheme() != "https" || !url.path().starts_with("/api/webhooks/") {
        return Err(ConfigError::InvalidUrl(
            "webhook.url must be an https webhook URL (.../api/webhooks/...)".to_string(),
        ));
    }

    if config.username.trim().is_empty() {
        return Err(ConfigError::Validation(
            "webhook.username cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "webhook.timeout-ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates state file paths
fn validate_state_config(config: &StateConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "state.snapshot-path cannot be empty".to_string(),
        ));
    }

    if config.count_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "state.count-path cannot be empty".to_string(),
        ));
    }

    if config.snapshot_path == config.count_path {
        return Err(ConfigError::Validation(
            "state.snapshot-path and state.count-path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates the extraction schema by compiling it
fn validate_extraction_schema(schema: &ExtractionSchema) -> Result<(), ConfigError> {
    if schema.fallback_key_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "extract.fallback-key-prefix cannot be empty".to_string(),
        ));
    }

    if schema.key.iter().any(|rule| rule.attribute.is_empty()) {
        return Err(ConfigError::Validation(
            "extract.key attribute names cannot be empty".to_string(),
        ));
    }

    CompiledSchema::compile(schema).map(|_| ())
}
