use std::time::Duration;

use http::{HeaderMap, Method, StatusCode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info};

use crate::client::request::{RequestDescriptor, RequestType};
use crate::config::settings::HttpConfig;
use crate::error::{Fault, Result};
use crate::observability::metrics::get_metrics;

static TRANSPORT_MSG: &'static str = "transport";
static STATUS_MSG: &'static str = "status";
static BODY_MSG: &'static str = "body";

/// Which response codes become faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Only 400, 401 and 500 are faults, everything else is returned as-is.
    Classified,
    /// Every status outside 2xx is a fault.
    #[default]
    AllNonSuccess,
}

impl StatusPolicy {
    pub fn check(&self, status: StatusCode) -> Result<()> {
        let is_fault = match self {
            StatusPolicy::Classified => matches!(
                status,
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::INTERNAL_SERVER_ERROR
            ),
            StatusPolicy::AllNonSuccess => !status.is_success(),
        };
        match is_fault {
            true => Err(Fault::from_status(status)),
            false => Ok(()),
        }
    }
}

/// Shared REST client. Holds no per-request state: headers travel inside each
/// [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    policy: StatusPolicy,
}

impl RestClient {
    pub fn new(client: Client, policy: StatusPolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_settings(http_config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http_config.timeout_ms))
            .build()
            .map_err(|e| Fault::general(500, format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client, http_config.status_policy))
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Inner reqwest client, shared with the token source.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Bind a header set to this client.
    pub fn prepare(&self, headers: HeaderMap) -> PreparedClient {
        PreparedClient {
            rest: self.clone(),
            headers,
        }
    }

    /// Send one request and return the response body.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<String> {
        let metrics = get_metrics().await;
        let start = Instant::now();
        let method = descriptor.request_type.as_str();

        info!("--------------> Petition[{}]: {}", method, descriptor.url);
        info!("--------------> JsonSend: {}", descriptor.body.as_deref().unwrap_or("null"));

        let mut request = self
            .client
            .request(Method::from(descriptor.request_type), &descriptor.url)
            .headers(descriptor.headers);
        if let Some(body) = descriptor.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Client exception ----------> {}", e);
            metrics.client_failures.with_label_values(&[method, TRANSPORT_MSG]).inc();
            metrics.client_duration.with_label_values(&[method]).observe(start.elapsed().as_secs_f64());
            Fault::general(
                StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                format!("Error on client request[{} {}]: {}", method, descriptor.url, e),
            )
        })?;

        let status = response.status();
        info!("--------------> Status : {}", status.as_u16());
        metrics.client_requests.with_label_values(&[method, status.as_str()]).inc();

        let body = response.text().await.map_err(|e| {
            metrics.client_failures.with_label_values(&[method, BODY_MSG]).inc();
            Fault::general(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), e.to_string())
        });
        metrics.client_duration.with_label_values(&[method]).observe(start.elapsed().as_secs_f64());

        self.policy.check(status).inspect_err(|fault| {
            error!(status = fault.status, "downstream answered with {}", fault.message);
            metrics.client_failures.with_label_values(&[method, STATUS_MSG]).inc();
        })?;

        let body = body?;
        info!("--------------> Output : {}", body);
        Ok(body)
    }
}

/// A [`RestClient`] with a header set bound by value. Cheap to clone; every
/// call builds its own descriptor from the bound headers.
#[derive(Debug, Clone)]
pub struct PreparedClient {
    rest: RestClient,
    headers: HeaderMap,
}

impl PreparedClient {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.request(RequestType::Get, url, None).await
    }

    pub async fn get_with_body<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<String> {
        self.send_json(RequestType::Get, url, body).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<String> {
        self.send_json(RequestType::Post, url, body).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<String> {
        self.send_json(RequestType::Put, url, body).await
    }

    pub async fn delete<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<String> {
        self.send_json(RequestType::Delete, url, body).await
    }

    pub async fn request(&self, request_type: RequestType, url: &str, body: Option<String>) -> Result<String> {
        let mut descriptor = RequestDescriptor::new(request_type, url).with_headers(self.headers.clone());
        descriptor.body = body;
        self.rest.request(descriptor).await
    }

    async fn send_json<T: Serialize + ?Sized>(&self, request_type: RequestType, url: &str, body: &T) -> Result<String> {
        let descriptor = RequestDescriptor::new(request_type, url)
            .with_headers(self.headers.clone())
            .with_json(body)?;
        self.rest.request(descriptor).await
    }
}
