use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::error::Result;
use crate::observability::metrics::get_metrics;
use crate::sources::{OAuth2Source, TokenSource};

static COLD_START_MSG: &'static str = "cold_start";
static REFRESH_MSG: &'static str = "refresh";

/// Holder of the system token.
///
/// Starts empty and is filled on first use; afterwards it only ever swaps one
/// token for a newer one. Fetches are serialized by `fetch_guard`, so callers
/// racing on an empty cache share a single OAuth request, and readers keep
/// seeing the previous token while a refresh is in flight.
#[derive(Debug)]
pub struct TokenCache<S: TokenSource = OAuth2Source> {
    source: S,
    cached: RwLock<Option<Arc<Token>>>,
    fetch_guard: Mutex<()>,
}

impl<S: TokenSource> TokenCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
            fetch_guard: Mutex::new(()),
        }
    }

    /// Current token without triggering a request.
    pub async fn cached(&self) -> Option<Arc<Token>> {
        self.cached.read().await.clone()
    }

    /// Cached token, requesting one first when the cache is empty.
    pub async fn get_token(&self) -> Result<Arc<Token>> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.fetch_guard.lock().await;
        // another caller may have filled the cache while we waited
        if let Some(token) = self.cached().await {
            debug!("token filled by concurrent request");
            return Ok(token);
        }
        self.request_token(COLD_START_MSG).await
    }

    /// Request a new token unconditionally and replace the cached one.
    pub async fn refresh_token(&self) -> Result<Arc<Token>> {
        info!("Refreshing token");
        let _guard = self.fetch_guard.lock().await;
        self.request_token(REFRESH_MSG).await
    }

    async fn request_token(&self, trigger: &str) -> Result<Arc<Token>> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        metrics.token_requests.with_label_values(&[trigger]).inc();

        let fetched = self.source.fetch_token().await;
        metrics
            .token_request_duration
            .with_label_values(&[trigger])
            .observe(start.elapsed().as_secs_f64());

        let token = Arc::new(fetched.inspect_err(|_| metrics.token_request_failures.inc())?);
        *self.cached.write().await = Some(token.clone());
        Ok(token)
    }
}
