//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks OAuth source, event logger, HTTP, logging, metrics and server settings

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::sinks::EventLoggerConfig;
use crate::config::sources::{OAuthSourceConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_oauth(&cfg.oauth, &mut errors);
    if let Some(event_logger) = &cfg.event_logger {
        validate_event_logger(event_logger, &mut errors);
    }

    if errors.is_empty() {
        info!("config validation passed");
        return Ok(());
    }

    let metrics = get_metrics().await;
    for e in &errors {
        error!("config: {}", e);
        metrics.config_validation_errors.inc();
    }
    Err(errors)
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be > 0".to_string());
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }

    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    match &settings.server {
        Some(server) => {
            if server.host.trim().is_empty() {
                errors.push("settings.server.host must not be empty".to_string());
            }
            if server.port.parse::<u16>().is_err() {
                errors.push(format!("settings.server.port '{}' is not a valid port", server.port));
            }
        }
        None if settings.metrics.is_enabled => {
            errors.push("settings.server is required when metrics are enabled".to_string());
        }
        None => {}
    }
}

fn validate_oauth(oauth: &OAuthSourceConfig, errors: &mut Vec<String>) {
    validate_url("oauth.url", &oauth.url, errors);
    if oauth.client_id.trim().is_empty() {
        errors.push("oauth.client_id must not be empty".to_string());
    }
    if oauth.client_secret.is_empty() {
        errors.push("oauth.client_secret must not be empty".to_string());
    }
    if !(1..=60).contains(&oauth.refresh_interval_minutes) {
        errors.push(format!(
            "oauth.refresh_interval_minutes {} must be between 1 and 60",
            oauth.refresh_interval_minutes
        ));
    }
}

fn validate_event_logger(event_logger: &EventLoggerConfig, errors: &mut Vec<String>) {
    validate_url("event_logger.url", &event_logger.url, errors);
    if event_logger.queue_capacity == 0 {
        errors.push("event_logger.queue_capacity must be > 0".to_string());
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if url.trim().is_empty() {
        errors.push(format!("{} must not be empty", field));
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} '{}' must start with http:// or https://", field, url));
    }
}
