//! Client options and their resolution
//!
//! Explicit values win, then the environment, then built-in defaults.
//! Empty strings count as unset.

use crate::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ASKDATA_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "ASKDATA_BASE_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://api.askdata.dev/v1";

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 600_000;
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;

/// Per-phase timeouts in milliseconds
///
/// Only `read_ms` is enforced: it bounds a whole retrieve call and the
/// header phase of a stream. `connect_ms` and `write_ms` are accepted and
/// stored but not applied separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutOptions {
    pub connect_ms: u64,
    pub read_ms: u64,
    pub write_ms: u64,
}

impl Default for TimeoutOptions {
    fn default() -> Self {
        Self {
            connect_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_ms: DEFAULT_READ_TIMEOUT_MS,
            write_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl TimeoutOptions {
    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }
}

/// Options accepted by [`QueryClient::new`](crate::client::QueryClient::new)
#[derive(Clone, Default, PartialEq)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: TimeoutOptions,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options populated from the environment only
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty(std::env::var(API_KEY_ENV).ok()),
            base_url: non_empty(std::env::var(BASE_URL_ENV).ok()),
            timeout: TimeoutOptions::default(),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: TimeoutOptions) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn read_timeout_ms(mut self, read_ms: u64) -> Self {
        self.timeout.read_ms = read_ms;
        self
    }

    /// Fill unset key and URL from a lower-priority layer
    pub fn or_layer(self, lower: ClientOptions) -> Self {
        Self {
            api_key: non_empty(self.api_key).or(non_empty(lower.api_key)),
            base_url: non_empty(self.base_url).or(non_empty(lower.base_url)),
            timeout: self.timeout,
        }
    }

    /// Apply environment fallbacks and defaults
    pub(crate) fn resolve(self) -> Result<ResolvedOptions> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with<F>(self, env: F) -> Result<ResolvedOptions>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(self.api_key)
            .or_else(|| non_empty(env(API_KEY_ENV)))
            .ok_or(ClientError::MissingApiKey {
                env_var: API_KEY_ENV,
            })?;

        let base_url = non_empty(self.base_url)
            .or_else(|| non_empty(env(BASE_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(ResolvedOptions {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved, immutable client configuration
#[derive(Clone, PartialEq)]
pub(crate) struct ResolvedOptions {
    pub api_key: String,
    pub base_url: String,
    pub timeout: TimeoutOptions,
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
