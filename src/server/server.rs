use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::envelope::ResponseEnvelope;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::security::ServiceClient;

pub const TOKEN_REFRESH_PATH: &str = "/token/refresh";

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub service_client: ServiceClient,
}

impl AppState {
    pub fn new(metrics: &Metrics, service_client: ServiceClient) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            service_client,
        }
    }
}

pub async fn router(settings_config: &SettingsConfig, service_client: ServiceClient) -> Router {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, service_client);

    Router::new()
        .merge(state.metrics_state.router(&settings_config.metrics))
        .route(TOKEN_REFRESH_PATH, post(refresh_token))
        .with_state(state)
}

/// Serve metrics and the on-demand token refresh route.
pub async fn start(settings_config: &SettingsConfig, service_client: ServiceClient) -> Result<()> {
    let Some(server) = &settings_config.server else {
        info!("no server configured, http endpoints disabled");
        return Ok(());
    };

    let app = router(settings_config, service_client).await;
    let address = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {}", address))?;
    info!("listening on {}", address);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await.context("http server stopped")?;
    Ok(())
}

async fn refresh_token(State(state): State<AppState>) -> (StatusCode, Json<ResponseEnvelope>) {
    match state.service_client.refresh_token().await {
        Ok(()) => (StatusCode::OK, Json(ResponseEnvelope::default())),
        Err(fault) => {
            error!("on-demand token refresh failed: {}", fault);
            let status = StatusCode::from_u16(fault.status).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
            (status, Json(ResponseEnvelope::from(fault)))
        }
    }
}
