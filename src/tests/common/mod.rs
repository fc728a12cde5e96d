// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::cache::{Token, TokenCache};
use crate::client::rest_client::{RestClient, StatusPolicy};
use crate::config::sources::OAuthSourceConfig;
use crate::error::{Fault, Result};
use crate::security::ServiceClient;
use crate::sources::{OAuth2Source, TokenSource};

pub const OAUTH_PATH: &str = "/oauth/token";
pub const CLIENT_ID: &str = "gafBack";
pub const CLIENT_SECRET: &str = "gafBackThisIsSecret";
/// base64 of `gafBack:gafBackThisIsSecret`
pub const BASIC_AUTHORIZATION: &str = "Basic Z2FmQmFjazpnYWZCYWNrVGhpc0lzU2VjcmV0";
/// nothing listens here
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/oauth/token";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn oauth_config(url: &str) -> OAuthSourceConfig {
    OAuthSourceConfig {
        url: url.to_owned(),
        client_id: CLIENT_ID.to_owned(),
        client_secret: CLIENT_SECRET.to_owned(),
        refresh_interval_minutes: 10,
    }
}

/// Token-aware client talking to the OAuth endpoint at `oauth_url`.
pub fn service_client(oauth_url: &str, policy: StatusPolicy) -> ServiceClient {
    let rest = RestClient::new(build_reqwest_client(), policy);
    let source = OAuth2Source::new(&oauth_config(oauth_url), rest.http().clone()).expect("oauth source");
    ServiceClient::new(rest, Arc::new(TokenCache::new(source)))
}

pub fn token_response(access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 43199,
        "scope": "read write",
        "compania": "ct",
        "jti": "0c3f6a1e"
    })
}

pub fn token(access_token: String) -> Token {
    Token {
        access_token,
        token_type: "bearer".to_owned(),
        refresh_token: None,
        expires_in: 600,
        scope: "read".to_owned(),
        company: "ct".to_owned(),
        jti: "jti".to_owned(),
    }
}

/// In-memory token source issuing `token-1`, `token-2`, ... and counting calls.
#[derive(Debug, Clone, Default)]
pub struct CountingSource {
    pub calls: Arc<AtomicUsize>,
    pub failing: Arc<AtomicBool>,
    pub delay: Option<Duration>,
}

impl CountingSource {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl TokenSource for CountingSource {
    async fn fetch_token(&self) -> Result<Token> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(Fault::security(503, "oauth unavailable"));
        }
        Ok(token(format!("token-{}", n)))
    }
}
