// This test simulates the event logging sink:
//  - oauth endpoint issues the system token
//  - event logger endpoint records (or rejects) what it receives
// Sending never blocks or fails the caller; shutdown waits for the queue.

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::HeaderMap as AxumHeaders;
    use axum::routing::post;
    use axum::{Json, Router};
    use http::header::AUTHORIZATION;
    use http::StatusCode;
    use httpmock::prelude::*;
    use serde::Serialize;
    use serde_json::Value;
    use tokio::sync::Mutex;

    use crate::client::rest_client::StatusPolicy;
    use crate::config::sinks::EventLoggerConfig;
    use crate::eventlogger::{EventLogger, EventRequest, EventType};
    use crate::observability::metrics::get_metrics;
    use crate::tests::common::{json, service_client, spawn_axum, token_response, OAUTH_PATH, UNREACHABLE_URL};

    type Received = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    #[derive(Clone)]
    struct SinkState {
        received: Received,
        status: StatusCode,
    }

    async fn record(State(state): State<SinkState>, headers: AxumHeaders, Json(event): Json<Value>) -> StatusCode {
        let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);
        state.received.lock().await.push((authorization, event));
        state.status
    }

    async fn spawn_sink(status: StatusCode) -> (tokio::task::JoinHandle<()>, EventLoggerConfig, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new().route("/events/send", post(record)).with_state(SinkState {
            received: received.clone(),
            status,
        });
        let (handle, addr) = spawn_axum(router).await;
        let config = EventLoggerConfig {
            url: format!("http://{}", addr),
            send_event: "/events/send".to_owned(),
            queue_capacity: 8,
        };
        (handle, config, received)
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderCreated {
        order_id: u64,
        amount: f64,
    }

    #[tokio::test]
    async fn events_are_posted_with_system_token() {
        let oauth = MockServer::start_async().await;
        let token_mock = oauth
            .mock_async(|when, then| {
                when.method(POST).path(OAUTH_PATH);
                then.status(200).json_body(token_response("sys-token"));
            })
            .await;
        let (sink_h, config, received) = spawn_sink(StatusCode::OK).await;

        let client = service_client(&oauth.url(OAUTH_PATH), StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;

        event_logger.send_event(
            EventRequest::new("jdoe", "ORDER_CREATED", "orders", "sales")
                .with_correlation_id("corr-1")
                .with_body(OrderCreated { order_id: 7, amount: 12.5 }),
        );
        event_logger.send_event(
            EventRequest::<Value>::new("jdoe", "ORDER_VIEWED", "orders", "sales").with_event_type(EventType::NonStore),
        );
        event_logger.shutdown(worker).await;

        let received = received.lock().await;
        assert_eq!(received.len(), 2);

        let (authorization, first) = &received[0];
        assert_eq!(authorization.as_deref(), Some("Bearer sys-token"));
        assert_eq!(
            *first,
            json!({
                "username": "jdoe",
                "correlationId": "corr-1",
                "eventType": "FULL_STORE",
                "eventName": "ORDER_CREATED",
                "applicationName": "orders",
                "coreName": "sales",
                "eventBody": {"orderId": 7, "amount": 12.5}
            })
        );
        assert_eq!(received[1].1["eventType"], "NON_STORE");
        assert_eq!(received[1].1["eventName"], "ORDER_VIEWED");

        assert_eq!(token_mock.calls_async().await, 1);
        sink_h.abort();
    }

    #[tokio::test]
    async fn rejected_events_are_swallowed() {
        let oauth = MockServer::start_async().await;
        oauth
            .mock_async(|when, then| {
                when.method(POST).path(OAUTH_PATH);
                then.status(200).json_body(token_response("sys-token"));
            })
            .await;
        let (sink_h, config, received) = spawn_sink(StatusCode::INTERNAL_SERVER_ERROR).await;

        let client = service_client(&oauth.url(OAUTH_PATH), StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;

        event_logger.send_event(EventRequest::<Value>::new("jdoe", "FIRST", "orders", "sales"));
        event_logger.send_event(EventRequest::<Value>::new("jdoe", "SECOND", "orders", "sales"));
        event_logger.shutdown(worker).await;

        // a failed delivery does not stop the worker
        assert_eq!(received.lock().await.len(), 2);
        sink_h.abort();
    }

    #[tokio::test]
    async fn events_are_dropped_when_oauth_is_down() {
        let (sink_h, config, received) = spawn_sink(StatusCode::OK).await;

        let client = service_client(UNREACHABLE_URL, StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;

        event_logger.send_event(EventRequest::<Value>::new("jdoe", "LOST", "orders", "sales"));
        event_logger.shutdown(worker).await;

        assert!(received.lock().await.is_empty());
        sink_h.abort();
    }

    #[tokio::test]
    async fn clones_share_one_queue() {
        let oauth = MockServer::start_async().await;
        oauth
            .mock_async(|when, then| {
                when.method(POST).path(OAUTH_PATH);
                then.status(200).json_body(token_response("sys-token"));
            })
            .await;
        let (sink_h, config, received) = spawn_sink(StatusCode::OK).await;

        let client = service_client(&oauth.url(OAUTH_PATH), StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;

        let other = event_logger.clone();
        let sender = tokio::spawn(async move {
            other.send_event(EventRequest::<Value>::new("batch", "FROM_TASK", "orders", "sales"));
        });
        sender.await.unwrap();
        event_logger.send_event(EventRequest::<Value>::new("jdoe", "FROM_MAIN", "orders", "sales"));
        event_logger.shutdown(worker).await;

        let mut names: Vec<String> = received
            .lock()
            .await
            .iter()
            .map(|(_, event)| event["eventName"].as_str().unwrap().to_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["FROM_MAIN", "FROM_TASK"]);
        sink_h.abort();
    }

    async fn dropped(reason: &str) -> u64 {
        get_metrics().await.events_failed.with_label_values(&[reason]).get()
    }

    #[tokio::test]
    async fn full_queue_drops_and_counts_events() {
        let (sink_h, mut config, _received) = spawn_sink(StatusCode::OK).await;
        config.queue_capacity = 1;

        let client = service_client(UNREACHABLE_URL, StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;
        let before = dropped("queue_full").await;

        // no await in between: the worker cannot take anything off the queue
        let start = std::time::Instant::now();
        for n in 0..5 {
            event_logger.send_event(EventRequest::<Value>::new("jdoe", format!("BURST_{}", n), "orders", "sales"));
        }
        assert!(start.elapsed() < std::time::Duration::from_millis(100), "send_event blocked");

        assert_eq!(dropped("queue_full").await - before, 4);
        event_logger.shutdown(worker).await;
        sink_h.abort();
    }

    #[tokio::test]
    async fn stopped_worker_drops_and_counts_events() {
        let (sink_h, config, received) = spawn_sink(StatusCode::OK).await;

        let client = service_client(UNREACHABLE_URL, StatusPolicy::AllNonSuccess);
        let (event_logger, worker) = EventLogger::start(client, &config).await;
        let other = event_logger.clone();
        let before = dropped("closed").await;

        worker.abort();
        let _ = worker.await;
        other.send_event(EventRequest::<Value>::new("jdoe", "TOO_LATE", "orders", "sales"));

        assert_eq!(dropped("closed").await - before, 1);
        assert!(received.lock().await.is_empty());
        sink_h.abort();
    }
}
