//! Error types for askdata
//!
//! One taxonomy covers construction, parsing, HTTP status handling and
//! transport failures. Transport errors are carried unchanged so callers can
//! downcast to the underlying client error.

use thiserror::Error;

/// Boxed transport-level error (connection reset, TLS failure, ...)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the askdata client
#[derive(Error, Debug)]
pub enum ClientError {
    /// No API key was passed and none was found in the environment
    #[error("Missing API key: pass one explicitly or set {env_var}")]
    MissingApiKey { env_var: &'static str },

    /// The base URL could not be used to build request URLs
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Object without a usable `__type__` field
    #[error("Missing discriminator: object has no `__type__` field")]
    MissingDiscriminator,

    /// Object whose `__type__` is not a recognised tag
    #[error("Unknown discriminator: {0}")]
    UnknownDiscriminator(String),

    /// Non-success HTTP status on the originating request
    #[error("HTTP error: status {status}")]
    HttpError { status: u16 },

    /// The request did not complete within the configured bound
    #[error("Request timed out after {timeout_ms}ms")]
    RequestTimeout { timeout_ms: u64 },

    /// Successful status but no readable response body
    #[error("Response has no body")]
    NoBody,

    /// Body was not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A stream record could not be decoded (strict mode only)
    #[error("Malformed stream line ({reason}): {line}")]
    MalformedLine { line: String, reason: String },

    /// Network-level failure, propagated as-is
    #[error(transparent)]
    Transport(BoxError),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

impl ClientError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpError { status } => Some(*status),
            _ => None,
        }
    }

    /// True for `MissingDiscriminator` / `UnknownDiscriminator`
    pub fn is_discriminator_error(&self) -> bool {
        matches!(
            self,
            ClientError::MissingDiscriminator | ClientError::UnknownDiscriminator(_)
        )
    }
}
