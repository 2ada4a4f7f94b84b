//! HTTP transport seam
//!
//! The client only needs a status code and a chunked body from the wire.
//! [`ReqwestTransport`] is the production implementation; tests plug in
//! scripted transports through the same trait.

use crate::errors::{ClientError, Result};
use crate::streaming::ByteStream;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// A JSON `POST` to issue
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,

    /// Sent as `Authorization: Bearer {api_key}`
    pub api_key: String,

    pub body: Value,
}

/// Status line and body reader of a response
pub struct TransportResponse {
    pub status: u16,
    pub body: Option<ByteStream>,
}

impl TransportResponse {
    pub fn new(status: u16, body: Option<ByteStream>) -> Self {
        Self { status, body }
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Anything that can send a JSON request and hand back a streamed body
///
/// Dropping the returned future must abort the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Transport backed by `reqwest`
///
/// No client-wide timeout is set: the caller bounds each phase itself so
/// long-lived streaming bodies are not cut off.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS roots, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
        debug!(url = %request.url, "sending request");

        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(status, "response headers received");

        let body: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(ClientError::from)),
        );

        Ok(TransportResponse::new(status, Some(body)))
    }
}

/// Read a body to the end
pub async fn collect_body(mut body: ByteStream) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_body_joins_chunks() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"{\"a\":")),
            Ok(Bytes::from_static(b"1}")),
        ];
        let body: ByteStream = Box::pin(futures_util::stream::iter(chunks));

        let bytes = collect_body(body).await.unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_collect_body_propagates_error() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"{")),
            Err(ClientError::from(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "read timed out",
            ))),
        ];
        let body: ByteStream = Box::pin(futures_util::stream::iter(chunks));

        let err = collect_body(body).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_reqwest_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }
}
