//! HTTP adapters: authentication, transport and video lookup.

mod authenticator;
mod transport;
mod video_lookup;

pub use authenticator::CredentialAuthenticator;
pub use transport::HttpMediaTransport;
pub use video_lookup::RestVideoLookup;
