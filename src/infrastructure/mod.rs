//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Serialized callback delivery.
pub mod dispatch;
/// HTTP adapters.
pub mod http;
/// Image URL sizing transforms.
pub mod image;
/// Credential storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, ConfigError, HttpConfig, LogLevel, StorageManager};
pub use dispatch::{DeliveryQueue, SerialDispatcher};
pub use http::{CredentialAuthenticator, HttpMediaTransport, RestVideoLookup};
pub use image::{CdnSizing, DEFAULT_CDN_HOST};
pub use storage::KeyringCredentialStore;
