mod credential_store_port;
mod delivery_port;
mod media_transport_port;
mod poster_frame_port;
mod request_authenticator_port;
mod sizing_port;
mod video_lookup_port;

pub use credential_store_port::CredentialStore;
pub use delivery_port::{DeliveryContext, DeliveryJob};
pub use media_transport_port::{MediaTransport, TransferResponse};
pub use poster_frame_port::PosterFrameExtractor;
pub use request_authenticator_port::RequestAuthenticator;
pub use sizing_port::SizingTransform;
pub use video_lookup_port::VideoLookupPort;

#[cfg(test)]
pub mod mocks {
    pub use super::credential_store_port::mock::MockCredentialStore;
    pub use super::media_transport_port::mock::{MockTransport, png_bytes};
    pub use super::request_authenticator_port::mock::MockAuthenticator;
    pub use super::video_lookup_port::MockVideoLookupPort;
}
