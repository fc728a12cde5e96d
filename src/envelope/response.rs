use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Fault, Result};

pub const RESPONSE_STATUS_OK: u16 = 200;
pub const RESPONSE_ERROR_OK: &str = "OK";

const NON_STANDARD_STATUS: u16 = 400;
const NON_STANDARD_MESSAGE: &str =
    "Non-standard response: responseStatus and/or responseError fields not found";

/// Marks types that follow the standard `{responseStatus, responseError, result}` convention.
pub trait StandardResponse {
    fn response_status(&self) -> u16;
    fn response_error(&self) -> &str;

    /// `Ok(true)` when the status is 200, otherwise a general fault built from
    /// the status and the error message of this response.
    fn validate_response_or_else(&self) -> Result<bool> {
        if self.response_status() != RESPONSE_STATUS_OK {
            return Err(Fault::general(self.response_status(), self.response_error()));
        }
        Ok(true)
    }

    fn response_valid(&self) -> bool {
        self.response_status() == RESPONSE_STATUS_OK
    }
}

/// Standard response wrapper. `T` defaults to a raw document so callers that
/// only care about the status can skip defining a result type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T = Value> {
    #[serde(default = "default_status")]
    pub response_status: u16,
    #[serde(default = "default_error")]
    pub response_error: String,
    pub result: Option<T>,
}

impl<T> Default for ResponseEnvelope<T> {
    fn default() -> Self {
        Self {
            response_status: RESPONSE_STATUS_OK,
            response_error: RESPONSE_ERROR_OK.to_owned(),
            result: None,
        }
    }
}

impl<T> ResponseEnvelope<T> {
    pub fn new(response_status: u16, result: Option<T>) -> Self {
        Self {
            response_status,
            response_error: RESPONSE_ERROR_OK.to_owned(),
            result,
        }
    }

    pub fn ok(result: T) -> Self {
        Self::new(RESPONSE_STATUS_OK, Some(result))
    }

    /// Consume the envelope, returning the result only when it is valid.
    pub fn into_result(self) -> Result<Option<T>> {
        self.validate_response_or_else()?;
        Ok(self.result)
    }
}

impl<T> From<&Fault> for ResponseEnvelope<T> {
    fn from(fault: &Fault) -> Self {
        Self {
            response_status: fault.status,
            response_error: fault.message.clone(),
            result: None,
        }
    }
}

impl<T> From<Fault> for ResponseEnvelope<T> {
    fn from(fault: Fault) -> Self {
        Self {
            response_status: fault.status,
            response_error: fault.message,
            result: None,
        }
    }
}

impl<T> StandardResponse for ResponseEnvelope<T> {
    fn response_status(&self) -> u16 {
        self.response_status
    }

    fn response_error(&self) -> &str {
        &self.response_error
    }
}

/// Check a raw document against the standard response convention.
///
/// Both `responseStatus` and `responseError` must be present, otherwise a 400
/// "non-standard response" fault is returned.
pub fn validate_json_node_response(node: &Value) -> Result<&Value> {
    let status = node.get("responseStatus").and_then(read_status);
    let error = node.get("responseError").and_then(read_text);

    let (status, error) = match (status, error) {
        (Some(status), Some(error)) => (status, error),
        _ => return Err(Fault::general(NON_STANDARD_STATUS, NON_STANDARD_MESSAGE)),
    };

    if status != RESPONSE_STATUS_OK {
        return Err(Fault::general(status, error));
    }
    Ok(node)
}

fn default_status() -> u16 {
    RESPONSE_STATUS_OK
}

fn default_error() -> String {
    RESPONSE_ERROR_OK.to_owned()
}

fn read_status(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_envelope_is_valid() {
        let envelope: ResponseEnvelope = ResponseEnvelope::default();
        assert_eq!(envelope.response_status, 200);
        assert_eq!(envelope.response_error, "OK");
        assert_eq!(envelope.validate_response_or_else(), Ok(true));
        assert!(envelope.response_valid());
    }

    #[test]
    fn non_ok_status_becomes_fault_with_same_status_and_message() {
        for status in [201u16, 400, 404, 500, 503] {
            let envelope = ResponseEnvelope::<Value> {
                response_status: status,
                response_error: format!("failure {}", status),
                result: None,
            };
            let fault = envelope.validate_response_or_else().unwrap_err();
            assert_eq!(fault.status, status);
            assert_eq!(fault.message, format!("failure {}", status));
            assert!(!envelope.response_valid());
        }
    }

    #[test]
    fn envelope_built_from_fault_copies_status_and_message() {
        let envelope: ResponseEnvelope<u32> = Fault::general(409, "duplicated folio").into();
        assert_eq!(envelope.response_status, 409);
        assert_eq!(envelope.response_error, "duplicated folio");
        assert_eq!(envelope.into_result().unwrap_err().status, 409);
    }

    #[test]
    fn envelope_wire_shape_uses_camel_case() {
        let envelope = ResponseEnvelope::ok(json!({"id": 1}));
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            wire,
            json!({"responseStatus": 200, "responseError": "OK", "result": {"id": 1}})
        );
        let back: ResponseEnvelope = serde_json::from_value(wire).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn json_node_without_standard_fields_is_rejected_with_400() {
        let fault = validate_json_node_response(&json!({"responseStatus": 200})).unwrap_err();
        assert_eq!(fault.status, 400);
        assert_eq!(fault.message, NON_STANDARD_MESSAGE);

        let fault = validate_json_node_response(&json!({"data": []})).unwrap_err();
        assert_eq!(fault.status, 400);
    }

    #[test]
    fn json_node_with_error_status_is_rejected_with_its_status() {
        let node = json!({"responseStatus": 404, "responseError": "Folio not found"});
        let fault = validate_json_node_response(&node).unwrap_err();
        assert_eq!(fault.status, 404);
        assert_eq!(fault.message, "Folio not found");
    }

    #[test]
    fn valid_json_node_is_returned_unchanged() {
        let node = json!({"responseStatus": 200, "responseError": "OK", "result": [1, 2]});
        assert_eq!(validate_json_node_response(&node).unwrap(), &node);
    }
}
