//! Failure sinks.
//!
//! # Responsibilities
//! - Record each failed fetch as one line: `{component} - {LEVEL} - {message}`
//! - Keep sink errors local; the fetcher only reports them
//!
//! # Implementations
//! - [`TracingSink`]: emits an `ERROR` event under [`FAILURE_TARGET`]
//! - [`FileSink`]: appends directly to a file
//! - [`MemorySink`]: keeps lines in memory
//! - [`NullSink`]: discards everything

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::fetch::FailureKind;

/// Tracing target for failure events.
pub const FAILURE_TARGET: &str = "resilient_fetch::failure";

/// Severity written for every failure line.
pub const FAILURE_LEVEL: tracing::Level = tracing::Level::ERROR;

/// Injected logging capability used by the fetcher.
pub trait FailureSink: Send + Sync {
    /// Record one failure. `message` already carries the kind prefix.
    fn record(&self, kind: FailureKind, message: &str) -> io::Result<()>;
}

impl<T: FailureSink + ?Sized> FailureSink for Arc<T> {
    fn record(&self, kind: FailureKind, message: &str) -> io::Result<()> {
        (**self).record(kind, message)
    }
}

/// Format a log line without the trailing newline.
pub fn format_line(component: &str, level: tracing::Level, message: &str) -> String {
    format!("{component} - {level} - {message}")
}

/// Forwards failures to the global `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, _kind: FailureKind, message: &str) -> io::Result<()> {
        // No extra fields: the failure file layer prints the message verbatim.
        tracing::error!(target: FAILURE_TARGET, "{}", message);
        Ok(())
    }
}

/// Append-only failure log file.
#[derive(Debug)]
pub struct FileSink {
    component: String,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>, component: impl Into<String>) -> io::Result<Self> {
        let file = open_append(path.as_ref())?;
        Ok(Self {
            component: component.into(),
            file: Mutex::new(file),
        })
    }
}

impl FailureSink for FileSink {
    fn record(&self, _kind: FailureKind, message: &str) -> io::Result<()> {
        let line = format_line(&self.component, FAILURE_LEVEL, message);
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("failure log lock poisoned"))?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}

/// Collects failure lines in memory.
#[derive(Debug)]
pub struct MemorySink {
    component: String,
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of recorded lines.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FailureSink for MemorySink {
    fn record(&self, _kind: FailureKind, message: &str) -> io::Result<()> {
        let line = format_line(&self.component, FAILURE_LEVEL, message);
        self.lines
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?
            .push(line);
        Ok(())
    }
}

/// Discards every failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FailureSink for NullSink {
    fn record(&self, _kind: FailureKind, _message: &str) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
