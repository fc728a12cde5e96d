use serde::Deserialize;

use crate::utils::constants::DEFAULT_EVENT_QUEUE_CAPACITY;

/// Event logger endpoint. Events are posted to `url` + `send_event`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventLoggerConfig {
    pub url: String,
    #[serde(default)]
    pub send_event: String,
    /// events waiting for dispatch; new events are dropped when full
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl EventLoggerConfig {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url, self.send_event)
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_EVENT_QUEUE_CAPACITY
}
