//! Version and usage text.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: chatstack [OPTIONS]

Options:
  --demo            Run against the built-in demo backend
  --config <path>   Read settings from <path>
  --user <id>       Connect as <id> instead of the configured user
  -h, --help        Print this help
  -V, --version     Print the version

Environment:
  CHATSTACK_API_KEY, CHATSTACK_USER_ID, CHATSTACK_USER_TOKEN,
  CHATSTACK_BASE_URL, CHATSTACK_WS_URL  override the config file
  CHATSTACK_LOG                         log filter (default chatstack=info)";

pub fn version_line() -> String {
    format!("chatstack {}", VERSION)
}
