//! Startup configuration types.
//!
//! [`AppConfig`] is the user-facing settings file. Values are layered:
//! built-in defaults, then the TOML file, then `CHATSTACK_*` environment
//! variables, then command-line flags. [`StartupConfig`] carries the
//! process-level switches (demo mode, log filter) in the builder style.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::BackendSettings;
use crate::cli::RunOptions;
use crate::error::{ConfigError, SUPPORTED_LANGUAGES};
use crate::models::theme::parse_hex_color;
use crate::models::{ColorScheme, ThemeTokens, UserRef, UserToken};

pub const DEFAULT_API_KEY: &str = "API_TOKEN";
pub const DEFAULT_USER_ID: &str = "ron";
pub const DEFAULT_USER_TOKEN: &str = "USER_TOKEN";
pub const DEFAULT_BASE_URL: &str = "https://chat.stream-io-api.com";
pub const DEFAULT_WS_URL: &str = "wss://chat.stream-io-api.com";
pub const DEFAULT_LOG_FILTER: &str = "chatstack=info";

pub const ENV_API_KEY: &str = "CHATSTACK_API_KEY";
pub const ENV_USER_ID: &str = "CHATSTACK_USER_ID";
pub const ENV_USER_TOKEN: &str = "CHATSTACK_USER_TOKEN";
pub const ENV_BASE_URL: &str = "CHATSTACK_BASE_URL";
pub const ENV_WS_URL: &str = "CHATSTACK_WS_URL";
pub const ENV_LOG: &str = "CHATSTACK_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub id: String,
    pub token: String,
    pub name: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_USER_ID.to_string(),
            token: DEFAULT_USER_TOKEN.to_string(),
            name: None,
        }
    }
}

/// `[theme]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Token overrides, e.g. `white_snow = "#FFFFFF"`
    pub colors: BTreeMap<String, String>,
}

/// Settings file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub ws_url: String,
    pub user: UserConfig,
    pub language: String,
    pub color_scheme: ColorScheme,
    pub connect_timeout_secs: u64,
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            user: UserConfig::default(),
            language: "en".to_string(),
            color_scheme: ColorScheme::Light,
            connect_timeout_secs: 15,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/chatstack/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatstack").join("config.toml"))
    }

    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Defaults, then the file, then the environment, then `options`.
    ///
    /// An explicit `--config` path must exist; the default path is optional.
    pub fn load(options: &RunOptions) -> Result<Self, ConfigError> {
        let mut config = match options.config_path.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli(options);
        config.validate()?;
        Ok(config)
    }

    /// Overlay non-empty values from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = get(ENV_USER_ID) {
            self.user.id = v;
        }
        if let Some(v) = get(ENV_USER_TOKEN) {
            self.user.token = v;
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = get(ENV_WS_URL) {
            self.ws_url = v;
        }
    }

    pub fn apply_cli(&mut self, options: &RunOptions) {
        if let Some(id) = &options.user_id {
            self.user.id = id.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.user.id.trim().is_empty() {
            return Err(ConfigError::Missing("user.id"));
        }
        if self.user.token.trim().is_empty() {
            return Err(ConfigError::Missing("user.token"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                field: "base_url",
                value: self.base_url.clone(),
            });
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl {
                field: "ws_url",
                value: self.ws_url.clone(),
            });
        }
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            return Err(ConfigError::UnsupportedLanguage(self.language.clone()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        for (token, value) in &self.theme.colors {
            if parse_hex_color(value).is_none() {
                return Err(ConfigError::InvalidColor {
                    token: token.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn identity(&self) -> UserRef {
        let user = UserRef::new(self.user.id.clone());
        match &self.user.name {
            Some(name) => user.with_name(name.clone()),
            None => user,
        }
    }

    pub fn credential(&self) -> UserToken {
        UserToken::new(self.user.token.clone())
    }

    /// Palette for the configured scheme with file overrides applied.
    pub fn theme_tokens(&self) -> ThemeTokens {
        ThemeTokens::for_scheme(self.color_scheme).merged(&self.theme.colors)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            ws_url: self.ws_url.clone(),
            api_key: self.api_key.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Process-level startup switches.
///
/// # Example
///
/// ```ignore
/// use chatstack::startup::StartupConfig;
///
/// let config = StartupConfig::default()
///     .with_demo(true)
///     .with_log_filter("chatstack=debug");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Use the in-memory demo backend
    pub demo: bool,
    /// `EnvFilter` directive for the log file
    pub log_filter: String,
    /// Override the log directory (default: `<data dir>/chatstack/logs`)
    pub log_dir: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            demo: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

impl StartupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Build from parsed flags plus `CHATSTACK_LOG`.
    pub fn from_options(options: &RunOptions) -> Self {
        let config = Self::default().with_demo(options.demo);
        match std::env::var(ENV_LOG) {
            Ok(filter) if !filter.trim().is_empty() => config.with_log_filter(filter),
            _ => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_demo_constants() {
        let config = AppConfig::default();
        assert_eq!(config.api_key, "API_TOKEN");
        assert_eq!(config.user.id, "ron");
        assert_eq!(config.user.token, "USER_TOKEN");
        assert_eq!(config.language, "en");
        assert_eq!(config.connect_timeout_secs, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r##"
            color_scheme = "dark"

            [user]
            id = "harry"
            name = "Harry"

            [theme.colors]
            white_snow = "#101010"
        "##;
        let config = AppConfig::from_toml_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.user.id, "harry");
        assert_eq!(config.user.token, "USER_TOKEN");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.color_scheme, ColorScheme::Dark);
        assert_eq!(config.identity().display_name(), "Harry");
        assert_eq!(config.theme_tokens().background(), "#101010");
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = AppConfig::from_toml_str("api_key = ", Path::new("bad.toml")).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, PathBuf::from("bad.toml")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let mut config = AppConfig::default();
        config.apply_env(lookup(&[
            (ENV_USER_ID, "hermione"),
            (ENV_USER_TOKEN, "secret"),
            (ENV_BASE_URL, "http://localhost:3030"),
            (ENV_API_KEY, ""),
        ]));
        assert_eq!(config.user.id, "hermione");
        assert_eq!(config.credential().as_str(), "secret");
        assert_eq!(config.base_url, "http://localhost:3030");
        // Empty values are ignored
        assert_eq!(config.api_key, "API_TOKEN");

        config.apply_cli(&RunOptions {
            user_id: Some("ginny".to_string()),
            ..RunOptions::default()
        });
        assert_eq!(config.user.id, "ginny");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.user.id = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("user.id"))));

        let mut config = AppConfig::default();
        config.ws_url = "https://chat.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "ws_url", .. })
        ));

        let mut config = AppConfig::default();
        config
            .theme
            .colors
            .insert("white_snow".to_string(), "snow".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidColor { .. })));
    }

    #[test]
    fn test_validate_rejects_unknown_language() {
        let mut config = AppConfig::default();
        config.language = "fr".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedLanguage(lang)) if lang == "fr"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.connect_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        config.connect_timeout_secs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_settings() {
        let settings = AppConfig::default().backend_settings();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.ws_url, DEFAULT_WS_URL);
        assert_eq!(settings.connect_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_startup_config_builder() {
        let config = StartupConfig::default()
            .with_demo(true)
            .with_log_filter("chatstack=debug")
            .with_log_dir("/tmp/logs");

        assert!(config.demo);
        assert_eq!(config.log_filter, "chatstack=debug");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(StartupConfig::new().log_filter, "chatstack=info");
    }
}
