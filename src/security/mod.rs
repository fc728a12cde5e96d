pub mod caller_context;
pub mod service_client;

pub use caller_context::CallerContext;
pub use service_client::ServiceClient;
