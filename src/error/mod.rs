//! Error handling for chatstack.
//!
//! Each layer owns a `thiserror` enum:
//!
//! - [`BackendError`] for chat backend adapters
//! - [`SessionError`] for the connect lifecycle
//! - [`ConfigError`] for settings
//!
//! [`ChatError`] unifies them for callers that cross layers, and every error
//! maps onto an [`ErrorCategory`] for user messaging.
//!
//! | Category | Retryable |
//! |----------|-----------|
//! | Network | Yes |
//! | Auth | No |
//! | Server | Yes |
//! | Client | No |
//! | Configuration | No |
//! | System | No |

mod backend;
mod category;
mod config;
mod session;

pub use backend::{classify_reqwest_error, BackendError};
pub use category::ErrorCategory;
pub use config::{ConfigError, SUPPORTED_LANGUAGES};
pub use session::SessionError;

use thiserror::Error;

/// Unified error type.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Backend(err) => err.category(),
            ChatError::Session(err) => err.category(),
            ChatError::Config(_) => ErrorCategory::Configuration,
            ChatError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Backend(err) => err.is_retryable(),
            other => other.category().is_retryable(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ChatError::Backend(err) => err.user_message(),
            ChatError::Session(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

/// Result alias for operations that can fail with any chatstack error.
pub type ChatResult<T> = Result<T, ChatError>;
