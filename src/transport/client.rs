//! `reqwest` backed transport.
//!
//! # Responsibilities
//! - Own the pooled HTTP session
//! - Enforce the per-attempt deadline over headers and body
//! - Classify `reqwest` failures into [`TransportError`]

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::config::ClientConfig;
use crate::resilience::timeouts::with_deadline;
use crate::transport::{Transport, TransportError, TransportResponse};

/// HTTP transport over a single reusable `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from client settings.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if let Ok(connect_timeout) = Duration::try_from_secs_f64(config.connect_timeout_secs) {
            builder = builder.connect_timeout(connect_timeout);
        }

        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(classify)?;
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
            retry_after,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<TransportResponse, TransportError> {
        with_deadline(timeout, self.send(url)).await
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

/// Map a `reqwest` error onto the transport taxonomy.
///
/// Connect failures win over timeouts, so a connect timeout is a
/// connection error.
pub fn classify(err: reqwest::Error) -> TransportError {
    let message = error_chain(&err);

    if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_timeout() {
        TransportError::Timeout(message)
    } else {
        TransportError::Other(message)
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
