//! # Service Commons Library
//!
//! Building blocks shared by services that call each other over REST:
//! a client wrapper with per-call headers, the standard response envelope,
//! an OAuth client-credentials token cache with scheduled refresh, a
//! fire-and-forget event logger, and JSON and date helpers.
//!
//! Modules:
//! - `client`: REST client, request descriptors and status policy
//! - `cache`: system token and its cache
//! - `sources`: OAuth2 token source and the scheduled refresh loop
//! - `security`: caller context and the token-aware client factory
//! - `eventlogger`: event requests and the async dispatcher
//! - `envelope`: `{responseStatus, responseError, result}` responses
//! - `codec`: JSON helpers
//! - `helpers`: date formats and refresh schedule

pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod eventlogger;
pub mod helpers;
pub mod observability;
pub mod security;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::sources::ServiceConfig;
pub use crate::error::{Fault, FaultDomain, Result};
