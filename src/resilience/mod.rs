//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch attempt:
//!     → timeouts.rs (bound the attempt by the request timeout)
//!     → On retryable status: retries.rs (check budget, pick the wait)
//!     → backoff.rs (exponential delay, capped, optional jitter)
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline
//! - Only listed statuses are retried; transport failures are terminal
//! - All policy is plain data, computed without I/O

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{RetryPolicy, StatusPolicy};
