//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::DisplayMetrics;
use crate::infrastructure::image::DEFAULT_CDN_HOST;

pub(crate) const APP_NAME: &str = "media-fetch";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Default managed-platform REST API root.
pub const DEFAULT_API_BASE_URL: &str = "https://public-api.wordpress.com/rest/v1.1";

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
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Sizing transform settings.
    #[serde(default)]
    pub sizing: SizingConfig,

    /// Current display description.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Managed-platform API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Sizing transform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Host of the public resizing CDN.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            cdn_host: default_cdn_host(),
        }
    }
}

/// Display configuration, in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width in points.
    #[serde(default = "default_display_width")]
    pub width: f64,
    /// Height in points.
    #[serde(default = "default_display_height")]
    pub height: f64,
    /// Pixels per point.
    #[serde(default = "default_display_scale")]
    pub scale: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
            scale: default_display_scale(),
        }
    }
}

impl From<DisplayConfig> for DisplayMetrics {
    fn from(config: DisplayConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            scale: config.scale,
        }
    }
}

/// Managed-platform REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

fn default_cdn_host() -> String {
    DEFAULT_CDN_HOST.to_string()
}

fn default_display_width() -> f64 {
    1280.0
}

fn default_display_height() -> f64 {
    800.0
}

fn default_display_scale() -> f64 {
    2.0
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(timeout) = args.timeout {
            self.http.timeout_secs = timeout;
        }
        if let Some(cdn_host) = &args.cdn_host {
            self.sizing.cdn_host.clone_from(cdn_host);
        }
        if let Some(base_url) = &args.api_base_url {
            self.api.base_url.clone_from(base_url);
        }
    }

    /// Display metrics from the `[display]` section.
    #[must_use]
    pub fn display_metrics(&self) -> DisplayMetrics {
        self.display.into()
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("media-fetch.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [http]
            timeout_secs = 5

            [display]
            width = 390.0
            height = 844.0
            scale = 3.0
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.user_agent.starts_with("media-fetch/"));
        assert_eq!(config.sizing.cdn_host, "i0.wp.com");
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);

        let display = config.display_metrics();
        assert!((display.scale - 3.0).abs() < f64::EPSILON);
        assert!((display.max_target_size().width - 844.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.http.timeout_secs, 30);
        assert!((config.display.width - 1280.0).abs() < f64::EPSILON);
        assert!((config.display.height - 800.0).abs() < f64::EPSILON);
        assert!((config.display.scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_log_path_prefers_configured_path() {
        let mut config = AppConfig::default();
        assert_eq!(config.effective_log_path(), AppConfig::default_log_path());

        config.log_path = Some(PathBuf::from("/tmp/media-fetch-test.log"));
        assert_eq!(
            config.effective_log_path(),
            Some(PathBuf::from("/tmp/media-fetch-test.log"))
        );
    }

    #[test]
    fn test_args_override_config() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "media-fetch",
            "--timeout",
            "7",
            "--log-level",
            "trace",
            "--cdn-host",
            "cdn.example.net",
            "credentials",
            "clear",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.http.timeout_secs, 7);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.sizing.cdn_host, "cdn.example.net");
    }
}
