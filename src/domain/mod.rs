//! Domain layer with core media types and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{FetchRequest, HostingContext, TargetSize};
pub use errors::MediaError;
pub use ports::{DeliveryContext, MediaTransport, RequestAuthenticator};
