//! Domain error types.

mod credential_error;
mod media_error;

pub use credential_error::CredentialError;
pub use media_error::{MediaError, MediaErrorKind, UNKNOWN_TRANSFER_FAILURE};
