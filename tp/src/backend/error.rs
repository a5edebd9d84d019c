//! Backend error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur talking to the trip-planning backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Error: {reason}")]
    Status { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),

    #[error("Request aborted: {0}")]
    Aborted(String),
}

impl BackendError {
    /// Build a status error from a non-2xx response code
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown status").to_string(),
        }
    }

    /// Message suitable for showing inline to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout(_))
    }
}
