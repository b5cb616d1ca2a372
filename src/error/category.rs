//! Error category classification.
//!
//! Categories drive the wording of the fatal connect panel and the transient
//! status line, and tell callers whether an error is worth retrying by hand.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout).
    Network,

    /// The backend rejected the user token or api key.
    Auth,

    /// Backend-side errors (HTTP 5xx, malformed payloads).
    Server,

    /// Client-side errors (invalid state, programming errors).
    Client,

    /// Missing or invalid settings.
    Configuration,

    /// OS and filesystem errors.
    System,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::System => "system",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Network connectivity issue",
            ErrorCategory::Auth => "Authentication problem",
            ErrorCategory::Server => "Chat service issue",
            ErrorCategory::Client => "Application error",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::System => "System error",
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and restart chatstack",
            ErrorCategory::Auth => "Check the api key and user token in your config",
            ErrorCategory::Server => "The chat service may be having issues. Try again later",
            ErrorCategory::Client => "This may be a bug. Please report it if it persists",
            ErrorCategory::Configuration => "Check your configuration file and environment",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
