//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientFetcher
//!     → sink.rs (FailureSink::record, one line per failed fetch)
//!     → tracing events (attempts, retries, outcomes) inside a fetch span
//!
//! Consumers:
//!     → logging.rs (console output, append-only failure file)
//! ```
//!
//! # Design Decisions
//! - The failure sink is injected, so fetch logic never touches global state
//! - Global subscriber setup is optional and happens once, at startup

pub mod logging;
pub mod sink;

pub use sink::{FailureSink, FileSink, MemorySink, NullSink, TracingSink};
