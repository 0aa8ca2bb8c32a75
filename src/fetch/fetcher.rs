//! Resilient JSON fetcher.
//!
//! # Responsibilities
//! - Issue one GET per attempt through the session transport
//! - Retry listed statuses with backoff, up to the retry budget
//! - Evaluate the final response (status, then JSON body)
//! - Classify every failure and record it to the failure sink
//!
//! # Flow
//! ```text
//! attempt → transport error?  → ConnectionError | Timeout | OtherRequestError
//!         → retryable status? → sleep(backoff) → attempt
//!         → budget exhausted? → StatusPolicy
//!         → status >= 400?    → HttpError
//!         → JSON body?        → Success | DecodeError
//! ```

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::fetch::outcome::{FailureKind, FetchOutcome};
use crate::fetch::request::FetchRequest;
use crate::observability::sink::{FailureSink, TracingSink};
use crate::resilience::StatusPolicy;
use crate::transport::{ReqwestTransport, Transport, TransportError, TransportResponse};

/// Fetches JSON with bounded retries, per-attempt timeouts and classified
/// failures. Never returns an error: every path ends in a [`FetchOutcome`].
///
/// The transport session is created once and reused by every call; it is
/// released when the fetcher is dropped.
pub struct ResilientFetcher<T: Transport = ReqwestTransport> {
    transport: T,
    sink: Arc<dyn FailureSink>,
}

impl ResilientFetcher<ReqwestTransport> {
    /// Build a fetcher over a fresh `reqwest` session.
    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(ReqwestTransport::new(config)?))
    }
}

impl<T: Transport> ResilientFetcher<T> {
    /// Create a fetcher that records failures through `tracing`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the failure sink.
    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Perform the request and return its single outcome.
    pub async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        let span = tracing::info_span!(
            "fetch",
            fetch_id = %Uuid::new_v4(),
            url = %request.url()
        );

        async move {
            let outcome = self.run(request).await;
            match &outcome {
                FetchOutcome::Success { .. } => tracing::debug!("Fetch succeeded"),
                FetchOutcome::Failure { kind, message } => self.report(*kind, message),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &FetchRequest) -> FetchOutcome {
        let policy = request.retry_policy();
        let mut retries_used = 0;

        loop {
            let attempt = attempt_number(retries_used);
            tracing::debug!(attempt, timeout = ?request.timeout(), "Sending request");

            let response = match self.transport.get(request.url(), request.timeout()).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Transport failure");
                    return classify_transport_error(e);
                }
            };

            let status = response.status.as_u16();
            if policy.should_retry(status, retries_used) {
                retries_used += 1;
                let delay = policy.delay_for(retries_used, status, response.retry_after);
                tracing::info!(attempt, status, delay = ?delay, "Retrying request");
                tokio::time::sleep(delay).await;
                continue;
            }

            if policy.is_retryable_status(status)
                && policy.status_policy() == StatusPolicy::RaiseOnStatus
            {
                return FetchOutcome::failure(
                    FailureKind::OtherRequestError,
                    format!(
                        "Max retries exceeded with url: {} (too many {} error responses)",
                        request.url(),
                        status
                    ),
                );
            }

            tracing::debug!(attempt, status, "Evaluating response");
            return evaluate_response(request.url(), response);
        }
    }

    fn report(&self, kind: FailureKind, message: &str) {
        let line = format!("{}: {}", kind.log_prefix(), message);
        if let Err(e) = self.sink.record(kind, &line) {
            tracing::warn!(error = %e, failure_kind = %kind, "Failed to record fetch failure");
        }
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for ResilientFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Map a transport failure to its outcome. Transport failures are never retried.
pub fn classify_transport_error(err: TransportError) -> FetchOutcome {
    match err {
        TransportError::Connect(message) => FetchOutcome::failure(FailureKind::ConnectionError, message),
        TransportError::Timeout(message) => FetchOutcome::failure(FailureKind::Timeout, message),
        TransportError::Other(message) => FetchOutcome::failure(FailureKind::OtherRequestError, message),
    }
}

/// Evaluate a final response: error statuses first, then the JSON body.
pub fn evaluate_response(url: &str, response: TransportResponse) -> FetchOutcome {
    let status = response.status;
    if status.is_client_error() || status.is_server_error() {
        return FetchOutcome::failure(FailureKind::HttpError, http_error_message(status, url));
    }

    match serde_json::from_slice(&response.body) {
        Ok(data) => FetchOutcome::Success { data },
        Err(e) => FetchOutcome::failure(FailureKind::DecodeError, e.to_string()),
    }
}

/// 1-based attempt number for logging.
fn attempt_number(retries_used: u32) -> u32 {
    retries_used.saturating_add(1)
}

fn http_error_message(status: StatusCode, url: &str) -> String {
    let side = if status.is_client_error() { "Client" } else { "Server" };
    let reason = status.canonical_reason().unwrap_or("Unknown");
    format!("{} {side} Error: {reason} for url: {url}", status.as_u16())
}
