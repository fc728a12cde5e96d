use std::sync::Arc;

use tracing::debug;

use crate::cache::token_cache::TokenCache;
use crate::client::request::{bearer_headers, json_headers};
use crate::client::rest_client::{PreparedClient, RestClient};
use crate::config::sources::ServiceConfig;
use crate::error::Result;
use crate::observability::metrics::get_metrics;
use crate::security::caller_context::CallerContext;
use crate::sources::{OAuth2Source, TokenSource};

static CALLER_MSG: &'static str = "caller";
static SYSTEM_MSG: &'static str = "system";

/// Hands out REST clients prepared for one authentication strategy.
///
/// With a caller context carrying a bearer token, that token is forwarded as
/// is. Without one (scheduled jobs, event-driven chains) the system token
/// obtained with the configured client credentials is used.
#[derive(Debug)]
pub struct ServiceClient<S: TokenSource = OAuth2Source> {
    rest: RestClient,
    tokens: Arc<TokenCache<S>>,
}

impl<S: TokenSource> Clone for ServiceClient<S> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest.clone(),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl ServiceClient<OAuth2Source> {
    /// REST client and OAuth source sharing one connection pool.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let rest = RestClient::from_settings(&config.settings.http)?;
        let source = OAuth2Source::new(&config.oauth, rest.http().clone())?;
        Ok(Self::new(rest, Arc::new(TokenCache::new(source))))
    }
}

impl<S: TokenSource> ServiceClient<S> {
    pub fn new(rest: RestClient, tokens: Arc<TokenCache<S>>) -> Self {
        Self { rest, tokens }
    }

    pub fn token_cache(&self) -> &Arc<TokenCache<S>> {
        &self.tokens
    }

    /// Client with JSON `Accept`/`Content-Type` and `Authorization: Bearer`.
    pub async fn client_with_bearer_token(&self, caller: Option<&CallerContext>) -> Result<PreparedClient> {
        let metrics = get_metrics().await;
        let headers = match caller.and_then(CallerContext::bearer_token) {
            Some(token) => {
                debug!("propagating caller bearer token");
                metrics.token_propagations.with_label_values(&[CALLER_MSG]).inc();
                bearer_headers(token)?
            }
            None => {
                let token = self.tokens.get_token().await?;
                metrics.token_propagations.with_label_values(&[SYSTEM_MSG]).inc();
                bearer_headers(&token.access_token)?
            }
        };
        Ok(self.rest.prepare(headers))
    }

    /// Client with JSON `Accept`/`Content-Type` only.
    pub fn client_without_security(&self) -> PreparedClient {
        self.rest.prepare(json_headers())
    }

    pub async fn refresh_token(&self) -> Result<()> {
        self.tokens.refresh_token().await.map(|_| ())
    }
}
