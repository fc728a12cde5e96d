pub mod response;

pub use response::{validate_json_node_response, ResponseEnvelope, StandardResponse};
