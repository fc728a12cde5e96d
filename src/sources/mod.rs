use crate::{cache::token::Token, error::Result};

pub mod executor;
pub mod oauth2;

pub use oauth2::OAuth2Source;

/// Something able to issue a fresh system token.
pub trait TokenSource: Send + Sync + 'static {
    fn fetch_token(&self) -> impl std::future::Future<Output = Result<Token>> + Send;
}
