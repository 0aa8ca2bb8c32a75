//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientFetcher
//!     → Transport::get (one attempt, bounded by the request timeout)
//!     → client.rs (reqwest session with a pooled connector)
//!     → TransportResponse | TransportError (Connect / Timeout / Other)
//! ```
//!
//! # Design Decisions
//! - The fetcher only sees this module's types; `reqwest::Error` is
//!   classified here and never leaks further
//! - One session per transport, reused across fetches, released on drop

pub mod client;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

pub use client::ReqwestTransport;

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Response status.
    pub status: StatusCode,
    /// Complete response body.
    pub body: Vec<u8>,
    /// `Retry-After` in whole seconds, when the server sent one.
    pub retry_after: Option<Duration>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

/// Failures before a complete response was received.
///
/// Variants are mutually exclusive; classification picks the first match
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// DNS, socket or connection establishment failure.
    #[error("{0}")]
    Connect(String),

    /// The attempt exceeded its wall-clock deadline.
    #[error("{0}")]
    Timeout(String),

    /// Any other request failure (malformed URL, protocol error, ...).
    #[error("{0}")]
    Other(String),
}

/// The HTTP client capability used by the fetcher.
///
/// Implementations perform exactly one GET per call and must return within
/// `timeout`, headers and body included.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).get(url, timeout)
    }
}
