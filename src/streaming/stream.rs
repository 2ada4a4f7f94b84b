//! Lazy stream of parsed response objects
//!
//! Drives a [`LineDecoder`] from an HTTP body. State machine:
//!
//! ```text
//! NotStarted --chunk--> Reading --chunk--> Reading
//!      |                   |
//!      +------- end -------+--> Draining --flush--> Closed
//!      +--- transport error / drop -----------------> Closed
//! ```
//!
//! The body is released on every transition into `Closed`, including when
//! the consumer drops the stream before it is exhausted.

use crate::errors::Result;
use crate::streaming::decoder::LineDecoder;
use crate::types::Parsed;
use bytes::Bytes;
use futures_util::stream::{FusedStream, Stream};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// Chunked response body as delivered by a transport
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Lifecycle of a [`ResponseStream`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No chunk read yet
    NotStarted,

    /// Chunks are arriving
    Reading,

    /// Body finished, final buffer flush pending
    Draining,

    /// Terminal; the body has been released
    Closed,
}

/// Stream of parsed objects decoded from a newline-delimited JSON body
pub struct ResponseStream {
    body: Option<ByteStream>,
    decoder: LineDecoder,
    ready: VecDeque<Result<Parsed>>,
    state: StreamState,
}

impl ResponseStream {
    /// Wrap a body with a lenient decoder
    pub fn new(body: ByteStream) -> Self {
        Self::with_decoder(body, LineDecoder::new())
    }

    pub fn with_decoder(body: ByteStream, decoder: LineDecoder) -> Self {
        Self {
            body: Some(body),
            decoder,
            ready: VecDeque::new(),
            state: StreamState::NotStarted,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Lines dropped (or surfaced, in strict mode) as malformed so far
    pub fn dropped_lines(&self) -> usize {
        self.decoder.dropped()
    }

    /// Stop reading and release the body
    ///
    /// Objects already decoded are still yielded.
    pub fn close(&mut self) {
        if self.body.take().is_some() {
            debug!(from = ?self.state, "releasing response body");
        }
        self.state = StreamState::Closed;
    }

    fn transition(&mut self, to: StreamState) {
        debug!(from = ?self.state, to = ?to, "response stream transition");
        self.state = to;
    }
}

impl Stream for ResponseStream {
    type Item = Result<Parsed>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(item) = this.ready.pop_front() {
                return Poll::Ready(Some(item));
            }

            match this.state {
                StreamState::Closed => return Poll::Ready(None),
                StreamState::Draining => {
                    if let Some(item) = this.decoder.finish() {
                        this.ready.push_back(item);
                    }
                    this.close();
                }
                StreamState::NotStarted | StreamState::Reading => {
                    let Some(body) = this.body.as_mut() else {
                        this.close();
                        continue;
                    };

                    match body.as_mut().poll_next(cx) {
                        Poll::Ready(Some(Ok(chunk))) => {
                            if this.state == StreamState::NotStarted {
                                this.transition(StreamState::Reading);
                            }
                            this.ready.extend(this.decoder.push(&chunk));
                        }
                        Poll::Ready(Some(Err(err))) => {
                            this.close();
                            return Poll::Ready(Some(Err(err)));
                        }
                        Poll::Ready(None) => this.transition(StreamState::Draining),
                        Poll::Pending => return Poll::Pending,
                    }
                }
            }
        }
    }
}

impl FusedStream for ResponseStream {
    fn is_terminated(&self) -> bool {
        self.state == StreamState::Closed && self.ready.is_empty()
    }
}

impl Drop for ResponseStream {
    fn drop(&mut self) {
        if self.state != StreamState::Closed {
            debug!(state = ?self.state, "response stream abandoned before completion");
            self.close();
        }
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream")
            .field("state", &self.state)
            .field("decoder", &self.decoder)
            .field("ready", &self.ready.len())
            .finish()
    }
}
