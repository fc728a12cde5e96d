pub mod request;
pub mod rest_client;

pub use request::{bearer_headers, json_headers, RequestDescriptor, RequestType};
pub use rest_client::{PreparedClient, RestClient, StatusPolicy};
