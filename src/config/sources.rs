use serde::Deserialize;

use crate::config::{settings::SettingsConfig, sinks::EventLoggerConfig};
use crate::utils::constants::DEFAULT_REFRESH_INTERVAL_MINUTES;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub oauth: OAuthSourceConfig,
    pub event_logger: Option<EventLoggerConfig>,
}

/// ================================
/// Sources
/// ================================
/// OAuth endpoint issuing the system token through the client-credentials grant.
/// `client_id` and `client_secret` must be registered in the OAuth server.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthSourceConfig {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    /// wall-clock period of the scheduled refresh
    #[serde(default = "default_refresh_interval_minutes")]
    pub refresh_interval_minutes: u32,
}

fn default_refresh_interval_minutes() -> u32 {
    DEFAULT_REFRESH_INTERVAL_MINUTES
}
