//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{
    ApiConfig, AppConfig, DEFAULT_API_BASE_URL, DisplayConfig, HttpConfig, LogLevel, SizingConfig,
};
pub use args::{CliArgs, Command, CredentialsCommand, FetchArgs, ResolveVideoArgs};
pub use storage::{ConfigError, StorageManager};
