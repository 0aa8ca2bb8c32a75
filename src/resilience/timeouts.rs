//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound a single transport attempt by a wall-clock deadline
//! - Report an elapsed deadline as a distinct timeout error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the inner future is dropped on expiry
//! - The deadline is per attempt, never per retry sequence

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::transport::TransportError;

/// Run `fut` with a hard deadline of `limit`.
pub async fn with_deadline<F, T>(limit: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(format!(
            "no response within {:.3}s",
            limit.as_secs_f64()
        ))),
    }
}
