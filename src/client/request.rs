use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;

use crate::codec::json;
use crate::error::{Fault, Result};

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Get => "GET",
            RequestType::Post => "POST",
            RequestType::Put => "PUT",
            RequestType::Delete => "DELETE",
        }
    }
}

impl From<RequestType> for Method {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::Get => Method::GET,
            RequestType::Post => Method::POST,
            RequestType::Put => Method::PUT,
            RequestType::Delete => Method::DELETE,
        }
    }
}

/// One outbound call. Built per request and handed to the client by value, so
/// concurrent callers never share header state.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub request_type: RequestType,
    pub url: String,
    pub body: Option<String>,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(request_type: RequestType, url: impl Into<String>) -> Self {
        Self {
            request_type,
            url: url.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` with the JSON codec and attach it.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        Ok(self.with_body(json::to_json_string(body)?))
    }
}

/// `Accept` and `Content-Type` set to JSON.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers
}

/// JSON headers plus `Authorization: Bearer <token>`.
pub fn bearer_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = json_headers();
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| Fault::security(400, format!("invalid bearer token: {}", e)))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
