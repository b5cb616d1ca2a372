//! Command-line argument parsing for chatstack.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Options for running the TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use the in-memory demo backend instead of the hosted service
    pub demo: bool,
    /// Explicit config file (`--config <path>`)
    pub config_path: Option<PathBuf>,
    /// Override the configured user id (`--user <id>`)
    pub user_id: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Bad arguments; carries the message shown before the usage text
    Usage(String),
    /// Run the TUI application (default)
    Run(RunOptions),
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win over everything else on the line.
///
/// # Examples
///
/// ```
/// use chatstack::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatstack".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--demo" => options.demo = true,
            "--config" => match args.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path)),
                None => return CliCommand::Usage("--config needs a path".to_string()),
            },
            "--user" => match args.next() {
                Some(id) if !id.is_empty() => options.user_id = Some(id),
                _ => return CliCommand::Usage("--user needs a user id".to_string()),
            },
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    options.config_path = Some(PathBuf::from(path));
                } else if let Some(id) = other.strip_prefix("--user=") {
                    options.user_id = Some(id.to_string());
                } else {
                    return CliCommand::Usage(format!("unknown argument '{}'", other));
                }
            }
        }
    }

    CliCommand::Run(options)
}
