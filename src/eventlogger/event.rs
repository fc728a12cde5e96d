use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the event logger stores an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Only store into a data base
    DbStore,
    /// Only store into a TXT file
    FileStore,
    /// Store into a data base and a TXT file
    #[default]
    FullStore,
    /// No store the event
    NonStore,
}

/// Event sent to the event logger. `B` is the body type; it defaults to a raw
/// JSON document, callers with a concrete payload can use their own type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest<B = Value> {
    pub username: String,
    #[serde(default)]
    pub correlation_id: String,
    #[serde(default)]
    pub event_type: EventType,
    pub event_name: String,
    pub application_name: String,
    pub core_name: String,
    pub event_body: Option<B>,
}

impl<B> EventRequest<B> {
    pub fn new(
        username: impl Into<String>,
        event_name: impl Into<String>,
        application_name: impl Into<String>,
        core_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            correlation_id: String::new(),
            event_type: EventType::default(),
            event_name: event_name.into(),
            application_name: application_name.into(),
            core_name: core_name.into(),
            event_body: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_body(mut self, body: B) -> Self {
        self.event_body = Some(body);
        self
    }
}
