//! Network transfer port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::AuthenticatedRequest;
use crate::domain::errors::MediaError;

/// Raw response from the transport.
#[derive(Debug, Clone, Default)]
pub struct TransferResponse {
    /// Response body, `None` when the provider returned nothing.
    pub body: Option<Bytes>,
    /// Content type header, if present.
    pub content_type: Option<String>,
}

impl TransferResponse {
    /// Response with a body.
    #[must_use]
    pub fn with_body(body: impl Into<Bytes>) -> Self {
        Self {
            body: Some(body.into()),
            content_type: None,
        }
    }

    /// Response without any payload.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Port for fetching raw media bytes.
///
/// Dropping the returned future must abort the transfer.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Performs the request.
    async fn fetch(&self, request: AuthenticatedRequest) -> Result<TransferResponse, MediaError>;
}
