//! JSON read and write helpers shared by the client, the envelope validator and
//! the event logger. Every failure is reported as a 500 general fault.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Fault, Result};

const INTERNAL_SERVER_ERROR: u16 = 500;

/// Marshal any serializable value into a JSON string.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Fault::general(INTERNAL_SERVER_ERROR, format!("Error getting json string: {}", e)))
}

/// Parse a JSON string into a document.
pub fn to_json_node(json: &str) -> Result<Value> {
    serde_json::from_str(json)
        .map_err(|e| Fault::general(INTERNAL_SERVER_ERROR, format!("Error getting JsonNode: {}", e)))
}

/// Read a single typed object out of a document. A document holding a list
/// only decodes into a list type.
pub fn from_json_node<T: DeserializeOwned>(node: Value) -> Result<T> {
    serde_json::from_value(node).map_err(|e| Fault::general(INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Turn any serializable value into a document.
pub fn to_json_node_from<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Fault::general(INTERNAL_SERVER_ERROR, format!("Error getting JsonNode: {}", e)))
}

/// Flatten a string-keyed mapping into a JSON object.
///
/// Arrays keep their native JSON form and nested objects are flattened with the
/// same rules, but every scalar leaf is written as a JSON string: `5` becomes
/// `"5"` and `true` becomes `"true"`. Keys are written in the mapping's
/// insertion order.
pub fn map_to_json(params: &Map<String, Value>) -> Result<String> {
    to_json_string(&flatten(params))
}

fn flatten(params: &Map<String, Value>) -> Value {
    let flattened = params
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::Array(_) => value.clone(),
                Value::Object(nested) => flatten(nested),
                Value::String(s) => Value::String(s.clone()),
                scalar => Value::String(scalar.to_string()),
            };
            (name.clone(), value)
        })
        .collect::<Map<String, Value>>();
    Value::Object(flattened)
}
