pub mod event;
pub mod service;

pub use event::{EventRequest, EventType};
pub use service::EventLogger;
