//! Startup: settings and logging, resolved before the terminal is touched.
//!
//! # Usage
//!
//! ```ignore
//! use chatstack::startup::{AppConfig, StartupConfig, init_logging};
//!
//! let startup = StartupConfig::from_options(&options);
//! let config = AppConfig::load(&options)?;
//! let log_path = init_logging(&startup)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{AppConfig, StartupConfig, ThemeConfig, UserConfig};
pub use logging::init_logging;
