//! Query service client
//!
//! Two operations:
//! - `retrieve`: POST .../retrieve, one JSON body, bounded by the read timeout
//! - `stream`: POST .../response, newline-delimited JSON events

use crate::client::options::{ClientOptions, ResolvedOptions, TimeoutOptions};
use crate::client::request::{endpoint_url, QueryRequest, Route};
use crate::client::transport::{collect_body, ReqwestTransport, Transport, TransportRequest};
use crate::errors::{ClientError, Result};
use crate::streaming::{LineDecoder, ResponseStream};
use crate::types::{parse, Parsed};
use std::sync::Arc;
use tracing::debug;

/// HTTP 409 on retrieve carries a regular body (soft failure)
const STATUS_CONFLICT: u16 = 409;
const STATUS_OK: u16 = 200;

/// Client for the query service
///
/// Holds immutable configuration only; every call owns its own buffers.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn Transport>,
    options: ResolvedOptions,
}

impl QueryClient {
    /// Create a client over the default `reqwest` transport
    pub fn new(options: ClientOptions) -> Result<Self> {
        let options = options.resolve()?;
        let transport = ReqwestTransport::new()?;
        Ok(Self {
            transport: Arc::new(transport),
            options,
        })
    }

    /// Create a client configured from the environment alone
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::default())
    }

    /// Create a client over a custom transport
    pub fn with_transport(options: ClientOptions, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            options: options.resolve()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    pub fn timeout(&self) -> TimeoutOptions {
        self.options.timeout
    }

    /// Full URL for a route, with or without a datafile segment
    pub fn endpoint(&self, route: Route, datafile_id: Option<&str>) -> String {
        endpoint_url(&self.options.base_url, datafile_id, route)
    }

    /// Run a structured query
    ///
    /// Status 200 and 409 both yield the parsed body; any other status is
    /// an `HttpError`. The whole call is bounded by the read timeout.
    ///
    /// # Returns
    /// The parsed body, normally a `retrieveResponse` or `apiError` object
    pub async fn retrieve(&self, request: &QueryRequest) -> Result<Parsed> {
        let url = self.endpoint(Route::Retrieve, request.datafile_id());
        let timeout_ms = self.options.timeout.read_ms;
        debug!(url = %url, timeout_ms, "retrieve");

        match tokio::time::timeout(self.options.timeout.read(), self.retrieve_inner(url, request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::RequestTimeout { timeout_ms }),
        }
    }

    async fn retrieve_inner(&self, url: String, request: &QueryRequest) -> Result<Parsed> {
        let response = self
            .transport
            .post_json(self.transport_request(url, request)?)
            .await?;

        if response.status != STATUS_OK && response.status != STATUS_CONFLICT {
            return Err(ClientError::HttpError {
                status: response.status,
            });
        }

        let Some(body) = response.body else {
            return Ok(Parsed::Null);
        };
        let bytes = collect_body(body).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Parsed::Null);
        }

        parse(serde_json::from_slice(&bytes)?)
    }

    /// Start a streamed natural-language response
    ///
    /// Only sending the request and receiving the status are bounded by the
    /// read timeout; the body is read without a per-chunk bound. Malformed
    /// lines are dropped with a diagnostic.
    ///
    /// # Returns
    /// Lazy stream of parsed events, in wire order
    pub async fn stream(&self, request: &QueryRequest) -> Result<ResponseStream> {
        self.stream_with(request, LineDecoder::new()).await
    }

    /// Like [`stream`](Self::stream), but malformed lines are yielded as
    /// `MalformedLine` errors instead of being dropped
    pub async fn stream_strict(&self, request: &QueryRequest) -> Result<ResponseStream> {
        self.stream_with(request, LineDecoder::strict()).await
    }

    async fn stream_with(
        &self,
        request: &QueryRequest,
        decoder: LineDecoder,
    ) -> Result<ResponseStream> {
        let url = self.endpoint(Route::Response, request.datafile_id());
        let timeout_ms = self.options.timeout.read_ms;
        debug!(url = %url, timeout_ms, policy = ?decoder.policy(), "stream");

        let send = self.transport.post_json(self.transport_request(url, request)?);
        let response = match tokio::time::timeout(self.options.timeout.read(), send).await {
            Ok(response) => response?,
            Err(_) => return Err(ClientError::RequestTimeout { timeout_ms }),
        };

        if response.status != STATUS_OK {
            return Err(ClientError::HttpError {
                status: response.status,
            });
        }

        let body = response.body.ok_or(ClientError::NoBody)?;
        Ok(ResponseStream::with_decoder(body, decoder))
    }

    fn transport_request(&self, url: String, request: &QueryRequest) -> Result<TransportRequest> {
        Ok(TransportRequest {
            url,
            api_key: self.options.api_key.clone(),
            body: serde_json::to_value(request)?,
        })
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.options)
            .finish()
    }
}
