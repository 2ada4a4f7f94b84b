//! Shared test fixtures: a scripted in-memory transport and a tiny HTTP
//! server speaking chunked HTTP/1.1 over a real socket.

#![allow(dead_code)]

use askdata::client::{Transport, TransportRequest, TransportResponse};
use askdata::errors::{ClientError, Result};
use askdata::streaming::ByteStream;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const START: &str = r#"{"__type__":"responseStart","callId":"call-1","query":"How many users?"}"#;
pub const DATA: &str = r#"{"__type__":"responseData","callId":"call-1","data":[{"__type__":"schemaData","schemaId":"users","schemaType":"sql","query":"SELECT count(*) FROM users","data":[{"count":42}],"summary":{},"maxRows":100,"isTruncated":false}]}"#;
pub const RESULT: &str = r#"{"__type__":"responseResult","callId":"call-1","responseStatus":"SUCCESS","llmResponse":{"text":"There are 42 users."}}"#;

/// One canned reply of a [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    /// `None` means the response has no body at all
    pub chunks: Option<Vec<Vec<u8>>>,
    /// Delay before the status is returned
    pub delay: Option<Duration>,
    /// Fail the body read after this many chunks
    pub fail_after: Option<usize>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self::chunks(status, vec![body.as_bytes().to_vec()])
    }

    pub fn chunks(status: u16, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            status,
            chunks: Some(chunks),
            delay: None,
            fail_after: None,
        }
    }

    pub fn no_body(status: u16) -> Self {
        Self {
            status,
            chunks: None,
            delay: None,
            fail_after: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_after(mut self, chunks: usize) -> Self {
        self.fail_after = Some(chunks);
        self
    }
}

/// Transport returning canned replies in order and recording requests
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left");

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        let body = reply.chunks.map(|chunks| {
            let fail_after = reply.fail_after.unwrap_or(usize::MAX);
            let mut items: Vec<Result<Bytes>> = chunks
                .into_iter()
                .take(fail_after)
                .map(|c| Ok(Bytes::from(c)))
                .collect();
            if reply.fail_after.is_some() {
                items.push(Err(ClientError::from(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ))));
            }
            let stream: ByteStream = Box::pin(futures_util::stream::iter(items));
            stream
        });

        Ok(TransportResponse::new(reply.status, body))
    }
}

/// Split `text` into chunks of at most `size` bytes, ignoring char boundaries
pub fn byte_chunks(text: &str, size: usize) -> Vec<Vec<u8>> {
    text.as_bytes().chunks(size.max(1)).map(<[u8]>::to_vec).collect()
}

/// Request as seen by [`HttpServer`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Single-shot HTTP/1.1 server writing a chunked response
pub struct HttpServer {
    pub addr: SocketAddr,
    captured: oneshot::Receiver<CapturedRequest>,
}

impl HttpServer {
    /// Serve one connection, answering with `status` and the given body chunks
    pub async fn start(status: u16, chunks: Vec<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);

            let head = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: application/x-ndjson\r\ntransfer-encoding: chunked\r\nconnection: close\r\n\r\n",
                status,
                reason(status)
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            for chunk in chunks {
                if chunk.is_empty() {
                    continue;
                }
                let mut frame = format!("{:x}\r\n", chunk.len()).into_bytes();
                frame.extend_from_slice(&chunk);
                frame.extend_from_slice(b"\r\n");
                if socket.write_all(&frame).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
            let _ = socket.shutdown().await;
        });

        Self { addr, captured: rx }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub async fn request(self) -> CapturedRequest {
        self.captured.await.expect("server saw no request")
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut tmp).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut tmp).await.unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
