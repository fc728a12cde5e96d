use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_requests: IntCounterVec,
    pub token_request_failures: IntCounter,
    pub token_request_duration: HistogramVec,
    pub token_propagations: IntCounterVec,

    // Client metrics
    pub client_requests: IntCounterVec,
    pub client_failures: IntCounterVec,
    pub client_duration: HistogramVec,

    // Event logger metrics
    pub events_sent: IntCounter,
    pub events_failed: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("servicecommons".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "OAuth token requests by trigger"), &["trigger"]).unwrap(),
            token_request_failures: IntCounter::new("token_request_failures_total", "Failed OAuth token requests").unwrap(),
            token_request_duration: HistogramVec::new(HistogramOpts::new("token_request_duration_seconds", "OAuth token request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["trigger"]).unwrap(),
            token_propagations: IntCounterVec::new(Opts::new("token_propagations_total", "Authorization headers attached by origin"), &["origin"]).unwrap(),

            // Client
            client_requests: IntCounterVec::new(Opts::new("client_requests_total", "Downstream requests by method and status"), &["method", "status"]).unwrap(),
            client_failures: IntCounterVec::new(Opts::new("client_failures_total", "Downstream request faults by reason"), &["method", "reason"]).unwrap(),
            client_duration: HistogramVec::new(HistogramOpts::new("client_request_duration_seconds", "Downstream request duration seconds").buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]), &["method"]).unwrap(),

            // Events
            events_sent: IntCounter::new("events_sent_total", "Events delivered to the event logger").unwrap(),
            events_failed: IntCounterVec::new(Opts::new("events_failed_total", "Events that were dropped or rejected"), &["reason"]).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_request_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_request_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_propagations.clone())).unwrap();
        reg.register(Box::new(metrics.client_requests.clone())).unwrap();
        reg.register(Box::new(metrics.client_failures.clone())).unwrap();
        reg.register(Box::new(metrics.client_duration.clone())).unwrap();
        reg.register(Box::new(metrics.events_sent.clone())).unwrap();
        reg.register(Box::new(metrics.events_failed.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
