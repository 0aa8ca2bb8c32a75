//! Fetch request definition.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use crate::resilience::{RetryPolicy, StatusPolicy};

/// Rejected request parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRequest {
    #[error("backoff factor must be finite and non-negative, got {0}")]
    Backoff(f64),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("status code {0} is outside 100..=599")]
    StatusOutOfRange(u16),

    #[error("{0} is not a valid number of seconds")]
    Duration(f64),
}

/// A single GET to perform, with its retry and timeout policy.
///
/// Immutable once built; construct one per call through [`FetchRequest::builder`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl FetchRequest {
    /// Start building a request for `url` with the default policy:
    /// 5s timeout, 3 retries, backoff factor 1, retry on 502/503/504.
    pub fn builder(url: impl Into<String>) -> FetchRequestBuilder {
        FetchRequestBuilder {
            url: url.into(),
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Per-attempt wall-clock limit.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.max_retries()
    }

    pub fn backoff_factor(&self) -> f64 {
        self.retry.backoff_factor()
    }

    pub fn retryable_status_codes(&self) -> &BTreeSet<u16> {
        self.retry.retryable_status_codes()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}

/// Builder for [`FetchRequest`].
#[derive(Debug, Clone)]
#[must_use]
pub struct FetchRequestBuilder {
    url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl FetchRequestBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.retry.backoff_factor = factor;
        self
    }

    /// Replace the retryable status set.
    pub fn retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retry.retryable_status_codes = codes.into_iter().collect();
        self
    }

    pub fn status_policy(mut self, policy: StatusPolicy) -> Self {
        self.retry.status_policy = policy;
        self
    }

    /// Cap for a single backoff delay.
    pub fn backoff_max(mut self, max: Duration) -> Self {
        self.retry.backoff_max = max;
        self
    }

    /// Upper bound of the random delay added to each backoff.
    pub fn backoff_jitter(mut self, jitter: Duration) -> Self {
        self.retry.backoff_jitter = jitter;
        self
    }

    pub fn respect_retry_after(mut self, respect: bool) -> Self {
        self.retry.respect_retry_after = respect;
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<FetchRequest, InvalidRequest> {
        let factor = self.retry.backoff_factor;
        if !factor.is_finite() || factor < 0.0 {
            return Err(InvalidRequest::Backoff(factor));
        }
        if self.timeout.is_zero() {
            return Err(InvalidRequest::ZeroTimeout);
        }
        if let Some(&code) = self
            .retry
            .retryable_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(InvalidRequest::StatusOutOfRange(code));
        }

        Ok(FetchRequest {
            url: self.url,
            timeout: self.timeout,
            retry: self.retry,
        })
    }
}
