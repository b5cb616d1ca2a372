//! Session lifecycle errors.

use thiserror::Error;

use super::backend::BackendError;
use super::category::ErrorCategory;
use crate::domain::session::ConnectionState;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// `connect` was already started once for this process.
    #[error("connect already started (session is {state:?})")]
    AlreadyStarted { state: ConnectionState },

    /// A completion arrived for a connect attempt that is not in flight.
    #[error("no connect attempt in flight")]
    NotConnecting,

    /// The connect handshake failed. Fatal for the session.
    #[error("connect failed: {0}")]
    Connect(#[from] BackendError),
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::AlreadyStarted { .. } | SessionError::NotConnecting => {
                ErrorCategory::Client
            }
            SessionError::Connect(err) => err.category(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SessionError::Connect(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_uses_backend_category() {
        let err: SessionError = BackendError::Auth {
            message: "bad token".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(err.user_message(), "Sign-in rejected: bad token");
    }

    #[test]
    fn test_already_started_is_client_error() {
        let err = SessionError::AlreadyStarted {
            state: ConnectionState::Connected,
        };
        assert_eq!(err.category(), ErrorCategory::Client);
        assert!(err.to_string().contains("Connected"));
    }
}
