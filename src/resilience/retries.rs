//! Retry policy.
//!
//! # Responsibilities
//! - Decide whether a response status is retryable
//! - Bound the number of retries per fetch
//! - Compute the wait before each retry (backoff or `Retry-After`)
//!
//! # Design Decisions
//! - Only response statuses are retried; connection errors and timeouts
//!   are terminal for a fetch
//! - What happens when the budget runs out is an explicit [`StatusPolicy`]

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::backoff::{backoff_delay, with_jitter};

/// Statuses for which a `Retry-After` header overrides the backoff.
pub const RETRY_AFTER_STATUS_CODES: [u16; 3] = [413, 429, 503];

/// Behavior once the retry budget is exhausted on a retryable status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Hand the last response back for normal evaluation.
    #[default]
    ReturnLastResponse,
    /// Terminate with a "max retries exceeded" request error.
    RaiseOnStatus,
}

/// Immutable retry settings for a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) backoff_factor: f64,
    pub(crate) backoff_max: Duration,
    pub(crate) backoff_jitter: Duration,
    pub(crate) retryable_status_codes: BTreeSet<u16>,
    pub(crate) respect_retry_after: bool,
    pub(crate) status_policy: StatusPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 1.0,
            backoff_max: Duration::from_secs(120),
            backoff_jitter: Duration::ZERO,
            retryable_status_codes: [502, 503, 504].into_iter().collect(),
            respect_retry_after: true,
            status_policy: StatusPolicy::ReturnLastResponse,
        }
    }
}

impl RetryPolicy {
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn backoff_max(&self) -> Duration {
        self.backoff_max
    }

    pub fn backoff_jitter(&self) -> Duration {
        self.backoff_jitter
    }

    pub fn retryable_status_codes(&self) -> &BTreeSet<u16> {
        &self.retryable_status_codes
    }

    pub fn respect_retry_after(&self) -> bool {
        self.respect_retry_after
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Total attempts allowed, counting the initial one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Check if a response status is in the retryable set.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Check if another attempt should follow a response with `status`,
    /// given how many retries were already spent.
    pub fn should_retry(&self, status: u16, retries_used: u32) -> bool {
        retries_used < self.max_retries && self.is_retryable_status(status)
    }

    /// Wait before retry number `retry` (1-based).
    ///
    /// A server supplied `Retry-After` wins for 413/429/503 when enabled.
    pub fn delay_for(&self, retry: u32, status: u16, retry_after: Option<Duration>) -> Duration {
        if self.respect_retry_after && RETRY_AFTER_STATUS_CODES.contains(&status) {
            if let Some(wait) = retry_after {
                return wait;
            }
        }

        let delay = backoff_delay(self.backoff_factor, retry, self.backoff_max);
        with_jitter(delay, self.backoff_jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_matches_helper() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.backoff_factor(), 1.0);
        assert_eq!(policy.status_policy(), StatusPolicy::ReturnLastResponse);
        assert!(policy.is_retryable_status(502));
        assert!(policy.is_retryable_status(503));
        assert!(policy.is_retryable_status(504));
        assert!(!policy.is_retryable_status(500));
        assert!(!policy.is_retryable_status(404));
    }

    #[test]
    fn test_should_retry_respects_budget() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(503, 0));
        assert!(policy.should_retry(503, 2));
        assert!(!policy.should_retry(503, 3));
        assert!(!policy.should_retry(200, 0));
        assert!(!policy.should_retry(404, 0));
    }

    #[test]
    fn test_zero_retries_never_retries() {
        let policy = RetryPolicy { max_retries: 0, ..RetryPolicy::default() };
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(503, 0));
    }

    #[test]
    fn test_delay_uses_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1, 502, None), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3, 502, None), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::default();
        let wait = Some(Duration::from_secs(7));
        assert_eq!(policy.delay_for(1, 503, wait), Duration::from_secs(7));
        // 502 is not a Retry-After status.
        assert_eq!(policy.delay_for(1, 502, wait), Duration::from_secs(1));

        let ignoring = RetryPolicy { respect_retry_after: false, ..RetryPolicy::default() };
        assert_eq!(ignoring.delay_for(1, 503, wait), Duration::from_secs(1));
    }
}
