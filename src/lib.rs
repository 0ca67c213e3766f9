//! Media fetching for a content editor.
//!
//! Resolves the right URL variant for the target size and hosting context,
//! attaches credentials, downloads and decodes the media as a cancellable
//! task, and delivers exactly one outcome on a caller-chosen delivery context.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and the fetcher facade.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "media-fetch";
