//! Application layer with the fetch facade, services and use cases.

/// Public fetch entry point.
pub mod media_fetcher;
/// Services: URL strategy, fetch task, placeholders.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use media_fetcher::MediaFetcher;
pub use services::{FetchHandle, TaskState, UrlStrategy, placeholder_for};
pub use use_cases::ResolveVideoSourceUseCase;
