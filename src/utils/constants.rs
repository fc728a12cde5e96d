//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REFRESH_INTERVAL_MINUTES: u32 = 10;
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 50;

// OAuth client-credentials grant
pub const GRANT_TYPE_FIELD: &str = "grant_type";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Status attached to token acquisition faults
pub const TOKEN_UNAVAILABLE_STATUS: u16 = 503;
