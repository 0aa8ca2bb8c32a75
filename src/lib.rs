//! Resilient JSON fetching over HTTP.
//!
//! One GET, bounded retries on transient statuses, a per-attempt timeout,
//! and a closed failure taxonomy. A fetch always yields exactly one
//! [`FetchOutcome`]; nothing escapes as an error.
//!
//! ```no_run
//! use resilient_fetch::{ClientConfig, FetchRequest, ResilientFetcher};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ResilientFetcher::from_config(&ClientConfig::default())?;
//! let request = FetchRequest::builder("https://reqres.in/api/users?page=2").build()?;
//!
//! match fetcher.fetch(&request).await.into_result() {
//!     Ok(data) => println!("{data}"),
//!     Err((kind, _)) => eprintln!("{}", kind.user_message()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod fetch;
pub mod observability;
pub mod resilience;
pub mod transport;

pub use config::{ClientConfig, FetcherConfig};
pub use fetch::{FailureKind, FetchOutcome, FetchRequest, ResilientFetcher};
pub use resilience::StatusPolicy;
