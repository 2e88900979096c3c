//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use super::args::CliArgs;
use crate::domain::entities::Timestamp;

pub(super) const APP_QUALIFIER: &str = "org";
pub(super) const APP_ORGANIZATION: &str = "mindline";
pub(super) const APP_NAME: &str = "mindline";

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Backend base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Remember signed-in users across restarts.
    #[serde(default = "default_true")]
    pub persist_session: bool,

    /// Per-request timeout in seconds. Zero waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: u64,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Timestamp format string (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl UiConfig {
    /// Resets an unusable timestamp format to the default.
    pub fn ensure_valid_timestamp_format(&mut self) {
        if !Timestamp::is_valid_format(&self.timestamp_format) {
            warn!(
                format = %self.timestamp_format,
                "Invalid timestamp format, using default"
            );
            self.timestamp_format = default_timestamp_format();
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = args.api_url {
            self.api_url = api_url;
        }
        if args.no_persist {
            self.persist_session = false;
        }
        self.ui.ensure_valid_timestamp_format();
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("mindline.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            api_url: default_api_url(),
            log_level: LogLevel::Info,
            persist_session: true,
            request_timeout_secs: 0,
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            api_url = "http://localhost:8000"
            request_timeout_secs = 30

            [ui]
            timestamp_format = "%H:%M:%S"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.ui.timestamp_format, "%H:%M:%S");
        assert!(config.persist_session);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.ui.timestamp_format, "%H:%M");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "mindline",
            "--api-url",
            "http://example.test",
            "--log-level",
            "debug",
            "--no-persist",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.api_url, "http://example.test");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!config.persist_session);
    }

    #[test]
    fn test_invalid_timestamp_format_replaced() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [ui]
            timestamp_format = "%H:%Q"
        "#,
        )
        .expect("Failed to parse config");

        config.merge_with_args(CliArgs::parse_from(["mindline"]));

        assert_eq!(config.ui.timestamp_format, "%H:%M");
    }
}
