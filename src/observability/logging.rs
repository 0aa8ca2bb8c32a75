//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber once
//! - Console output filtered by config level or `RUST_LOG`
//! - Optional append-only failure log in `{component} - {LEVEL} - {message}` lines
//!
//! # Design Decisions
//! - The failure file only receives events under [`FAILURE_TARGET`]
//! - The console never receives them; end users see fixed messages only
//! - The subscriber is never torn down

use std::io;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::{filter_fn, FilterExt, ParseError};
use tracing_subscriber::fmt::{self, format, FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::observability::sink::{open_append, FAILURE_TARGET};

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("cannot open log file: {0}")]
    Io(#[from] io::Error),

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Event formatter producing `{component} - {LEVEL} - {message}`.
#[derive(Debug, Clone)]
pub struct LineFormat {
    component: String,
}

impl LineFormat {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} - {} - ", self.component, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Console layer: `filter` minus failure lines.
fn console_layer<S, W>(filter: EnvFilter, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_filter(filter.and(filter_fn(|meta| meta.target() != FAILURE_TARGET)))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `config.level` for console output.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let console = console_layer(filter, io::stderr);

    let failure_file = match &config.file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .event_format(LineFormat::new(config.component.clone()))
                .with_writer(Mutex::new(open_append(path)?))
                .with_filter(filter_fn(|meta| meta.target() == FAILURE_TARGET)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(failure_file)
        .try_init()?;

    Ok(())
}
