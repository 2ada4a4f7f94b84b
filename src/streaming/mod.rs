//! Streaming module
//!
//! Provides the incremental line decoder and the response stream built on it.

pub mod decoder;
pub mod stream;

// Re-export commonly used types
pub use decoder::{DecodePolicy, LineDecoder, LINE_SEPARATOR};
pub use stream::{ByteStream, ResponseStream, StreamState};
