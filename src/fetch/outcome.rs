//! Fetch results and the failure taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed classification of everything that can go wrong in a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The server answered with a 4xx or 5xx status.
    HttpError,
    /// DNS, socket or connection failure.
    ConnectionError,
    /// No complete response within the timeout.
    Timeout,
    /// Any other request failure.
    OtherRequestError,
    /// The body was not valid JSON.
    DecodeError,
}

impl FailureKind {
    pub const ALL: [FailureKind; 5] = [
        FailureKind::HttpError,
        FailureKind::ConnectionError,
        FailureKind::Timeout,
        FailureKind::OtherRequestError,
        FailureKind::DecodeError,
    ];

    /// Message safe to show an end user.
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::HttpError => "A server error occurred. Please try again later.",
            FailureKind::ConnectionError => {
                "Failed to connect to the server. Please check your network connection."
            }
            FailureKind::Timeout => "The request timed out. Please try again later.",
            FailureKind::OtherRequestError => "An error occurred. Please try again later.",
            FailureKind::DecodeError => "Failed to parse the response. Please try again later.",
        }
    }

    /// Prefix used when the failure is written to a log.
    pub fn log_prefix(self) -> &'static str {
        match self {
            FailureKind::HttpError => "HTTP error occurred",
            FailureKind::ConnectionError => "Connection error occurred",
            FailureKind::Timeout => "Timeout error occurred",
            FailureKind::OtherRequestError => "An error occurred",
            FailureKind::DecodeError => "JSON decode error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::HttpError => write!(f, "HttpError"),
            FailureKind::ConnectionError => write!(f, "ConnectionError"),
            FailureKind::Timeout => write!(f, "Timeout"),
            FailureKind::OtherRequestError => write!(f, "OtherRequestError"),
            FailureKind::DecodeError => write!(f, "DecodeError"),
        }
    }
}

/// The single result of a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    Success { data: serde_json::Value },
    Failure { kind: FailureKind, message: String },
}

impl FetchOutcome {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        FetchOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    /// Failure kind, `None` on success.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            FetchOutcome::Success { .. } => None,
            FetchOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            FetchOutcome::Success { data } => Some(data),
            FetchOutcome::Failure { .. } => None,
        }
    }

    /// Convert into a `Result`, keeping the failure parts.
    pub fn into_result(self) -> Result<serde_json::Value, (FailureKind, String)> {
        match self {
            FetchOutcome::Success { data } => Ok(data),
            FetchOutcome::Failure { kind, message } => Err((kind, message)),
        }
    }
}
