//! askdata - client for a hosted natural-language data-query service
//!
//! # Architecture
//!
//! - **types**: discriminated response model and the tag-checking parser
//! - **streaming**: newline-delimited JSON decoder and response stream
//! - **client**: options, endpoints, transport seam and `QueryClient`
//! - **config** / **cli**: configuration file and command line for the binary
//!
//! ```no_run
//! use askdata::{ClientOptions, QueryClient, QueryRequest};
//! use futures_util::StreamExt;
//!
//! # async fn run() -> askdata::Result<()> {
//! let client = QueryClient::new(ClientOptions::new().api_key("sk-..."))?;
//!
//! let mut events = client.stream(&QueryRequest::new("How many users?")).await?;
//! while let Some(event) = events.next().await {
//!     println!("{:?}", event?.kind());
//! }
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod types;
pub mod streaming;
pub mod client;

// Re-export commonly used types
pub use errors::{ClientError, Result};
pub use types::{parse, parse_optional, ObjectKind, Parsed, ResponseObject, ResponseStatus, Tagged};
pub use streaming::{LineDecoder, ResponseStream};
pub use client::{ClientOptions, QueryClient, QueryRequest, TimeoutOptions, Transport};

// CLI support
pub mod cli;
pub mod config;
