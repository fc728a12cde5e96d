use std::fmt;

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Area of the toolkit a fault was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultDomain {
    /// REST calls, envelopes, codecs, dates
    General,
    /// token acquisition and propagation
    Security,
}

impl FaultDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultDomain::General => "general",
            FaultDomain::Security => "security",
        }
    }
}

impl fmt::Display for FaultDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried by every fallible operation of the crate: an HTTP-like status
/// code plus a message, tagged with the domain that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{domain} fault: {{status={status} message={message}}}")]
pub struct Fault {
    pub domain: FaultDomain,
    pub status: u16,
    pub message: String,
}

impl Fault {
    pub fn new(domain: FaultDomain, status: u16, message: impl Into<String>) -> Self {
        Self {
            domain,
            status,
            message: message.into(),
        }
    }

    pub fn general(status: u16, message: impl Into<String>) -> Self {
        Self::new(FaultDomain::General, status, message)
    }

    pub fn security(status: u16, message: impl Into<String>) -> Self {
        Self::new(FaultDomain::Security, status, message)
    }

    /// General fault carrying the canonical reason phrase of `status`.
    pub fn from_status(status: StatusCode) -> Self {
        Self::general(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status"),
        )
    }

    pub fn is_security(&self) -> bool {
        self.domain == FaultDomain::Security
    }
}

pub type Result<T> = std::result::Result<T, Fault>;
