//! Query service client module
//!
//! Provides the client, its options, request types and the HTTP transport.

pub mod options;
pub mod query;
pub mod request;
pub mod transport;

// Re-export commonly used types
pub use options::{
    ClientOptions, TimeoutOptions, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL,
};
pub use query::QueryClient;
pub use request::{endpoint_url, QueryRequest, Route};
pub use transport::{collect_body, ReqwestTransport, Transport, TransportRequest, TransportResponse};
