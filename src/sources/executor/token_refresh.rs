use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::token_cache::TokenCache;
use crate::helpers::time::next_refresh_after;
use crate::sources::TokenSource;

impl<S: TokenSource> TokenCache<S> {
    /// Refresh the token on wall-clock boundaries every `interval_minutes`,
    /// regardless of callers currently using it. A failed refresh is logged
    /// and the previous token stays cached. Each boundary fires at most once.
    pub fn loop_refresh_token(self: &Arc<Self>, interval_minutes: u32) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut fired: Option<DateTime<Utc>> = None;
            loop {
                let next = next_refresh_after(Utc::now(), fired, interval_minutes);
                sleep_until_next_refresh(next).await;
                fired = Some(next);

                match cache.refresh_token().await {
                    Ok(token) => debug!(expires_in = token.expires_in, "scheduled refresh stored token"),
                    Err(fault) => error!(status = fault.status, "scheduled token refresh failed: {}", fault.message),
                }
            }
        })
    }
}

async fn sleep_until_next_refresh(next: DateTime<Utc>) {
    let sleep_interval = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    info!(
        "sleep interval {} seconds, next token refresh at {}",
        sleep_interval.as_secs(),
        next
    );
    tokio::time::sleep(sleep_interval).await;
}
