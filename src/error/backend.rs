//! Errors raised by chat backend adapters.

use thiserror::Error;

use super::category::ErrorCategory;

/// Failure talking to the chat backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Could not reach the backend at all.
    #[error("connection to '{url}' failed: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The operation did not finish in time.
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    /// The backend refused the credentials.
    #[error("authentication rejected: {message}")]
    Auth { message: String },

    /// The backend answered with a non-2xx status.
    #[error("api error {status} (code {code}): {message}")]
    Api {
        status: u16,
        code: i64,
        message: String,
    },

    /// The payload could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A call that needs a live connection ran before connect.
    #[error("not connected")]
    NotConnected,

    /// The socket was closed.
    #[error("connection closed")]
    Closed,
}

impl BackendError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BackendError::ConnectionFailed { .. }
            | BackendError::Timeout { .. }
            | BackendError::Closed => ErrorCategory::Network,
            BackendError::Auth { .. } => ErrorCategory::Auth,
            BackendError::Api { status, .. } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            BackendError::Api { status, .. } if *status >= 500 => ErrorCategory::Server,
            BackendError::Api { .. } => ErrorCategory::Client,
            BackendError::InvalidResponse(_) => ErrorCategory::Server,
            BackendError::NotConnected => ErrorCategory::Client,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Api { status, .. } => *status >= 500 || *status == 429,
            other => other.category().is_retryable(),
        }
    }

    /// Short line for the status bar.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::ConnectionFailed { .. } => {
                "Unable to reach the chat service.".to_string()
            }
            BackendError::Timeout { operation, secs } => {
                format!("{} timed out after {} seconds.", operation, secs)
            }
            BackendError::Auth { message } => format!("Sign-in rejected: {}", message),
            BackendError::Api { status: 429, .. } => {
                "Too many requests. Please wait a moment.".to_string()
            }
            BackendError::Api { message, .. } => format!("The chat service said: {}", message),
            BackendError::InvalidResponse(_) => {
                "Received an unexpected response from the chat service.".to_string()
            }
            BackendError::NotConnected => "Not connected to the chat service.".to_string(),
            BackendError::Closed => "The connection to the chat service closed.".to_string(),
        }
    }
}

/// Classify a reqwest error for `url`.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str, timeout_secs: u64) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout {
            operation: "request".to_string(),
            secs: timeout_secs,
        }
    } else if err.is_connect() || err.is_request() {
        BackendError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_decode() {
        BackendError::InvalidResponse(err.to_string())
    } else {
        BackendError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::InvalidResponse(err.to_string())
    }
}
