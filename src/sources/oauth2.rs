use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use reqwest::Client;
use tracing::{error, info};

use crate::cache::token::Token;
use crate::config::sources::OAuthSourceConfig;
use crate::error::{Fault, Result};
use crate::sources::TokenSource;
use crate::utils::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, GRANT_TYPE_FIELD, TOKEN_UNAVAILABLE_STATUS};

/// Client-credentials grant against the configured OAuth endpoint.
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    url: String,
    authorization: HeaderValue,
    client: Client,
}

impl OAuth2Source {
    pub fn new(cfg: &OAuthSourceConfig, client: Client) -> Result<Self> {
        Ok(Self {
            url: cfg.url.clone(),
            authorization: basic_authorization(&cfg.client_id, &cfg.client_secret)?,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TokenSource for OAuth2Source {
    async fn fetch_token(&self) -> Result<Token> {
        info!("Requesting token");
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, self.authorization.clone())
            .form(&[(GRANT_TYPE_FIELD, GRANT_TYPE_CLIENT_CREDENTIALS)])
            .send()
            .await
            .map_err(token_fault)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_fault(format!("OAuth token request failed: {} {}", status, body)));
        }

        let token: Token = response.json().await.map_err(token_fault)?;
        info!(token_type = %token.token_type, expires_in = token.expires_in, "Token received");
        Ok(token)
    }
}

/// `Basic base64(client_id:client_secret)`
pub fn basic_authorization(client_id: &str, client_secret: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{}:{}", client_id, client_secret));
    HeaderValue::from_str(&format!("Basic {}", encoded))
        .map_err(|e| Fault::security(TOKEN_UNAVAILABLE_STATUS, format!("invalid OAuth credentials: {}", e)))
}

fn token_fault(err: impl std::fmt::Display) -> Fault {
    error!("Client exception ----------> {}", err);
    Fault::security(
        TOKEN_UNAVAILABLE_STATUS,
        format!("Error on Client[requestToken]: {}", err),
    )
}
