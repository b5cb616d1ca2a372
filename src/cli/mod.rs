//! CLI module for chatstack.
//!
//! The CLI dispatcher should be called early in main() to handle
//! command-line flags before initializing the TUI:
//!
//! ```ignore
//! use chatstack::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     // CLI command was executed, exit with result
//!     std::process::exit(if result.is_ok() { 0 } else { 2 });
//! }
//! // No CLI command, continue to TUI
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, RunOptions};
pub use version::{version_line, USAGE, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a CLI command if applicable.
///
/// * `None` - the command is `Run` (no CLI action needed)
/// * `Some(Ok(()))` - an informational command printed its output
/// * `Some(Err(e))` - the arguments were invalid; usage was printed
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}\n\n{}", version_line(), USAGE);
            Some(Ok(()))
        }
        CliCommand::Usage(message) => {
            eprintln!("error: {}\n\n{}", message, USAGE);
            Some(Err(eyre!("{}", message)))
        }
        CliCommand::Run(_) => None,
    }
}
