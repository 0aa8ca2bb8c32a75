//! Fetch subsystem.
//!
//! # Data Flow
//! ```text
//! FetchRequest (url + timeout + RetryPolicy, immutable)
//!     → fetcher.rs (attempt loop over a Transport)
//!     → outcome.rs (Success | Failure { FailureKind, message })
//! ```

pub mod fetcher;
pub mod outcome;
pub mod request;

pub use fetcher::ResilientFetcher;
pub use outcome::{FailureKind, FetchOutcome};
pub use request::{FetchRequest, FetchRequestBuilder, InvalidRequest};
