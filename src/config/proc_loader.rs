use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::settings::LoggingConfig;
use crate::config::sources::ServiceConfig;
use crate::observability::metrics::get_metrics;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content).inspect_err(|e| {
        error!("parse config error: {}", e);
        metrics.config_validation_errors.inc();
    })?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)
        .await
        .map_err(|errors| anyhow!("invalid config:\n  - {}", errors.join("\n  - ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value, the
/// default, or an empty string.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.to_string())
}
