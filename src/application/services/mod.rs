//! Application services.

pub mod fetch_task;
pub mod placeholder_service;
pub mod url_strategy;

pub use fetch_task::{
    FailureCallback, FetchDependencies, FetchHandle, FetchTask, SuccessCallback, TaskState,
};
pub use placeholder_service::placeholder_for;
pub use url_strategy::UrlStrategy;
