//! Error Taxonomy
//!
//! Every fallible operation in the crate returns `TrackerResult`.
//! Malformed stored values never reach this type: they are coerced to
//! defaults where they are read.

use thiserror::Error;

/// Common result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Tracker-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// Bad credentials or unreachable identity endpoint. Fatal for data access.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-200 response or an error object reported by the feature service.
    #[error("Feature service error: {message}")]
    Service {
        code: Option<i64>,
        message: String,
    },

    /// Zero records matched an identifier.
    #[error("No record found where {field} = '{value}'")]
    NotFound {
        field: String,
        value: String,
    },

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn service(message: impl Into<String>) -> Self {
        TrackerError::Service { code: None, message: message.into() }
    }

    /// True when the error should block all further data access
    pub fn is_blocking(&self) -> bool {
        matches!(self, TrackerError::Auth(_) | TrackerError::Config(_))
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        TrackerError::Service {
            code: err.status().map(|s| i64::from(s.as_u16())),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::service(format!("Malformed response: {}", err))
    }
}
