//! Configuration loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Interface languages that have strings.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("theme token '{token}' has invalid colour '{value}' (expected #RRGGBB)")]
    InvalidColor { token: String, value: String },

    #[error("invalid url for '{field}': {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("connect_timeout_secs must be at least 1")]
    ZeroTimeout,
}
