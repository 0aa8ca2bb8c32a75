//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fetcher.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchRequest, InvalidRequest};
use crate::resilience::StatusPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FetcherConfig {
    /// Default target URL when none is given on the command line.
    pub url: Option<String>,

    /// Per-request retry and timeout settings.
    pub request: RequestConfig,

    /// HTTP session settings.
    pub client: ClientConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Retry and timeout settings applied to every fetch.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RequestConfig {
    /// Per-attempt timeout in seconds.
    pub timeout_secs: f64,

    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Base multiplier for exponential backoff, in seconds.
    pub backoff_factor: f64,

    /// Response statuses that trigger a retry.
    pub retryable_status_codes: Vec<u16>,

    /// Fail with a request error instead of returning the last response
    /// once retries are exhausted.
    pub raise_on_status: bool,

    /// Upper bound for a single backoff delay, in seconds.
    pub backoff_max_secs: f64,

    /// Random extra delay added to each backoff, in seconds.
    pub backoff_jitter_secs: f64,

    /// Honor `Retry-After` on 413, 429 and 503.
    pub respect_retry_after: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5.0,
            max_retries: 3,
            backoff_factor: 1.0,
            retryable_status_codes: vec![502, 503, 504],
            raise_on_status: false,
            backoff_max_secs: 120.0,
            backoff_jitter_secs: 0.0,
            respect_retry_after: true,
        }
    }
}

impl RequestConfig {
    /// Build a validated [`FetchRequest`] for `url` from these settings.
    pub fn to_request(&self, url: impl Into<String>) -> Result<FetchRequest, InvalidRequest> {
        let policy = if self.raise_on_status {
            StatusPolicy::RaiseOnStatus
        } else {
            StatusPolicy::ReturnLastResponse
        };

        FetchRequest::builder(url)
            .timeout(secs(self.timeout_secs)?)
            .max_retries(self.max_retries)
            .backoff_factor(self.backoff_factor)
            .retryable_status_codes(self.retryable_status_codes.iter().copied())
            .status_policy(policy)
            .backoff_max(secs(self.backoff_max_secs)?)
            .backoff_jitter(secs(self.backoff_jitter_secs)?)
            .respect_retry_after(self.respect_retry_after)
            .build()
    }
}

fn secs(value: f64) -> Result<Duration, InvalidRequest> {
    Duration::try_from_secs_f64(value).map_err(|_| InvalidRequest::Duration(value))
}

/// HTTP session configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: f64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle connections kept per host.
    pub pool_max_idle_per_host: usize,

    /// Route through proxies from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("resilient-fetch/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 5.0,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 8,
            use_system_proxy: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level directive (trace, debug, info, warn, error).
    pub level: String,

    /// Component name written at the start of each failure log line.
    pub component: String,

    /// Append-only failure log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            component: "resilient_fetch".to_string(),
            file: None,
        }
    }
}
