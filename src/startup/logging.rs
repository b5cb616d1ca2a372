//! File logging.
//!
//! The terminal belongs to the TUI, so tracing output goes to a timestamped
//! file under the data directory instead of stderr.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use super::config::StartupConfig;

/// `<data dir>/chatstack/logs`, falling back to the temp dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("chatstack")
        .join("logs")
}

/// `chatstack-<timestamp>.log` inside `dir`.
pub fn log_file_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("chatstack-{}.log", stamp))
}

/// Parse the configured filter, falling back to the default on bad input.
pub fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive)
        .unwrap_or_else(|_| EnvFilter::new(super::config::DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Returns the log file path.
///
/// A second call (tests, re-entry) leaves the first subscriber in place.
pub fn init_logging(config: &StartupConfig) -> io::Result<PathBuf> {
    let dir = config.log_dir.clone().unwrap_or_else(default_log_dir);
    fs::create_dir_all(&dir)?;
    let path = log_file_path(&dir);
    let file = File::create(&path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log_filter))
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "chatstack starting");
    Ok(path)
}
