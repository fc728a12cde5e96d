use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::codec::json;
use crate::config::sinks::EventLoggerConfig;
use crate::error::Result;
use crate::eventlogger::event::EventRequest;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::security::service_client::ServiceClient;
use crate::sources::TokenSource;
use crate::utils::channel;

static SERIALIZE_MSG: &'static str = "serialize";
static QUEUE_FULL_MSG: &'static str = "queue_full";
static CLOSED_MSG: &'static str = "closed";
static DELIVERY_MSG: &'static str = "delivery";

/// Fire-and-forget handle to the event logger.
///
/// `send_event` only enqueues; a background worker posts each event with the
/// system bearer token. Failures are logged and counted, never returned.
#[derive(Clone)]
pub struct EventLogger {
    sender: Sender<EventRequest>,
    metrics: &'static Arc<Metrics>,
}

impl EventLogger {
    /// Spawn the dispatch worker. The worker stops once every handle is dropped
    /// and the queue is drained.
    pub async fn start<S: TokenSource>(
        service_client: ServiceClient<S>,
        config: &EventLoggerConfig,
    ) -> (Self, JoinHandle<()>) {
        let metrics = get_metrics().await;
        let (sender, receiver) = channel::run(config.queue_capacity);
        let endpoint = config.endpoint();
        info!("event logger dispatching to {}", endpoint);
        let worker = tokio::spawn(dispatch_events(service_client, endpoint, receiver));
        (Self { sender, metrics }, worker)
    }

    pub fn send_event<B: Serialize>(&self, event: EventRequest<B>) {
        let event_name = event.event_name.clone();
        let event = match into_document(event) {
            Ok(event) => event,
            Err(fault) => {
                error!("Error serializing event {}: {}", event_name, fault.message);
                self.count_failure(SERIALIZE_MSG);
                return;
            }
        };

        match self.sender.try_send(event) {
            Ok(()) => debug!("event {} queued", event_name),
            Err(TrySendError::Full(_)) => {
                warn!("event queue full, dropping event {}", event_name);
                self.count_failure(QUEUE_FULL_MSG);
            }
            Err(TrySendError::Closed(_)) => {
                warn!("event logger stopped, dropping event {}", event_name);
                self.count_failure(CLOSED_MSG);
            }
        }
    }

    fn count_failure(&self, reason: &str) {
        self.metrics.events_failed.with_label_values(&[reason]).inc();
    }

    /// Drop this handle and wait for the worker to drain the queue. Returns
    /// once every other clone of the handle is gone as well.
    pub async fn shutdown(self, worker: JoinHandle<()>) {
        drop(self.sender);
        if let Err(e) = worker.await {
            error!("event logger worker ended abnormally: {}", e);
        }
    }
}

async fn dispatch_events<S: TokenSource>(
    service_client: ServiceClient<S>,
    endpoint: String,
    mut receiver: Receiver<EventRequest>,
) {
    let metrics = get_metrics().await;
    while let Some(event) = receiver.recv().await {
        match post_event(&service_client, &endpoint, &event).await {
            Ok(_) => {
                info!("Event sent");
                metrics.events_sent.inc();
            }
            Err(fault) => {
                error!(status = fault.status, "Error sending event {}: {}", event.event_name, fault.message);
                metrics.events_failed.with_label_values(&[DELIVERY_MSG]).inc();
            }
        }
    }
    info!("event logger queue closed");
}

async fn post_event<S: TokenSource>(
    service_client: &ServiceClient<S>,
    endpoint: &str,
    event: &EventRequest,
) -> Result<String> {
    service_client
        .client_with_bearer_token(None)
        .await?
        .post(endpoint, event)
        .await
}

fn into_document<B: Serialize>(event: EventRequest<B>) -> Result<EventRequest> {
    let event_body = event
        .event_body
        .as_ref()
        .map(json::to_json_node_from)
        .transpose()?;
    Ok(EventRequest {
        username: event.username,
        correlation_id: event.correlation_id,
        event_type: event.event_type,
        event_name: event.event_name,
        application_name: event.application_name,
        core_name: event.core_name,
        event_body,
    })
}

