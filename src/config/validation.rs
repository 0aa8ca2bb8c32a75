//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes in range)
//! - Check the default URL and log filter parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FetcherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::FetcherConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("url '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{field} must be a positive number of seconds, got {value}")]
    NonPositiveDuration { field: &'static str, value: f64 },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("status code {0} is outside 100..=599")]
    StatusOutOfRange(u16),

    #[error("logging.component must not be empty")]
    EmptyComponent,

    #[error("logging.level '{level}' is not a valid filter: {reason}")]
    InvalidLogLevel { level: String, reason: String },

    #[error("client.user_agent must not be empty")]
    EmptyUserAgent,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &FetcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(url) = &config.url {
        if let Err(e) = url::Url::parse(url) {
            errors.push(ValidationError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            });
        }
    }

    let request = &config.request;
    check_positive(&mut errors, "request.timeout_secs", request.timeout_secs);
    check_non_negative(&mut errors, "request.backoff_factor", request.backoff_factor);
    check_non_negative(&mut errors, "request.backoff_max_secs", request.backoff_max_secs);
    check_non_negative(&mut errors, "request.backoff_jitter_secs", request.backoff_jitter_secs);

    for &code in &request.retryable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::StatusOutOfRange(code));
        }
    }

    check_positive(&mut errors, "client.connect_timeout_secs", config.client.connect_timeout_secs);
    if config.client.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }

    if config.logging.component.trim().is_empty() {
        errors.push(ValidationError::EmptyComponent);
    }
    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        errors.push(ValidationError::InvalidLogLevel {
            level: config.logging.level.clone(),
            reason: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ValidationError::NonPositiveDuration { field, value });
    }
}

fn check_non_negative(errors: &mut Vec<ValidationError>, field: &'static str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ValidationError::NegativeValue { field, value });
    }
}
