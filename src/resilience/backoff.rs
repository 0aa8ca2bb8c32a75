//! Exponential backoff with optional jitter.

use std::time::Duration;
use rand::Rng;

/// Calculate the delay before retry number `retry` (1-based).
///
/// The delay is `factor * 2^(retry - 1)` seconds, capped at `max`.
/// Retry zero is the initial attempt and never waits.
pub fn backoff_delay(factor: f64, retry: u32, max: Duration) -> Duration {
    if retry == 0 || factor <= 0.0 || !factor.is_finite() {
        return Duration::ZERO;
    }

    let exponential_base = 2f64.powi(retry.saturating_sub(1).min(i32::MAX as u32) as i32);
    let delay_secs = factor * exponential_base;

    if !delay_secs.is_finite() || delay_secs >= max.as_secs_f64() {
        return max;
    }

    Duration::from_secs_f64(delay_secs)
}

/// Add a uniformly distributed jitter in `[0, jitter)` to `delay`.
pub fn with_jitter(delay: Duration, jitter: Duration) -> Duration {
    if jitter.is_zero() {
        return delay;
    }

    let extra = rand::thread_rng().gen_range(0.0..jitter.as_secs_f64());
    delay.saturating_add(Duration::from_secs_f64(extra))
}
