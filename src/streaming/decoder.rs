//! Incremental newline-delimited JSON decoder
//!
//! Reassembles records split across arbitrary chunk boundaries:
//! - Buffer: raw bytes until a `\n` arrives
//! - Decode: UTF-8 per complete line, so multi-byte characters split across
//!   chunks are joined before decoding (`\n` never occurs inside one)
//! - Recovery: a line that fails to decode is dropped, the stream goes on

use crate::errors::{ClientError, Result};
use crate::types::{parse_str, Parsed};
use bytes::BytesMut;
use tracing::warn;

/// Line separator for the streaming endpoint
pub const LINE_SEPARATOR: u8 = b'\n';

/// Characters of a dropped line included in the diagnostic
const PREVIEW_CHARS: usize = 120;

/// What happens to a line that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Drop it with a diagnostic
    #[default]
    Lenient,

    /// Yield it as a `MalformedLine` error, then keep going
    Strict,
}

/// Incremental line decoder
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Bytes of the current incomplete record
    buffer: BytesMut,

    /// Offset up to which `buffer` is known to hold no separator
    scanned: usize,

    policy: DecodePolicy,

    /// Lines rejected so far
    dropped: usize,
}

impl LineDecoder {
    /// Create a lenient decoder
    pub fn new() -> Self {
        Self::with_policy(DecodePolicy::Lenient)
    }

    /// Create a decoder that surfaces malformed lines as errors
    pub fn strict() -> Self {
        Self::with_policy(DecodePolicy::Strict)
    }

    pub fn with_policy(policy: DecodePolicy) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            scanned: 0,
            policy,
            dropped: 0,
        }
    }

    /// Add a chunk and decode every record it completes
    ///
    /// In lenient mode only `Ok` items are returned.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Parsed>> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer[self.scanned..]
            .iter()
            .position(|&b| b == LINE_SEPARATOR)
        {
            let line = self.buffer.split_to(self.scanned + pos + 1);
            self.scanned = 0;
            if let Some(item) = self.decode_line(&line[..line.len() - 1]) {
                out.push(item);
            }
        }
        self.scanned = self.buffer.len();

        out
    }

    /// Flush the trailing unterminated record, if any
    pub fn finish(&mut self) -> Option<Result<Parsed>> {
        let rest = self.buffer.split();
        self.scanned = 0;
        self.decode_line(&rest)
    }

    /// Bytes waiting for a line separator
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of lines rejected so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    fn decode_line(&mut self, line: &[u8]) -> Option<Result<Parsed>> {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text,
            Err(e) => {
                let lossy = String::from_utf8_lossy(line).into_owned();
                return self.reject(&lossy, format!("invalid UTF-8: {}", e));
            }
        };

        if text.trim().is_empty() {
            return None;
        }

        match parse_str(text) {
            Ok(parsed) => Some(Ok(parsed)),
            Err(e) => self.reject(text, e.to_string()),
        }
    }

    fn reject(&mut self, line: &str, reason: String) -> Option<Result<Parsed>> {
        self.dropped += 1;
        warn!(
            reason = %reason,
            line = %preview(line),
            "dropping malformed stream line"
        );

        match self.policy {
            DecodePolicy::Lenient => None,
            DecodePolicy::Strict => Some(Err(ClientError::MalformedLine {
                line: line.to_string(),
                reason,
            })),
        }
    }
}

fn preview(line: &str) -> String {
    let mut chars = line.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
