//! HTTP and local file media transport.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::entities::AuthenticatedRequest;
use crate::domain::errors::MediaError;
use crate::domain::ports::{MediaTransport, TransferResponse};
use crate::infrastructure::config::HttpConfig;

/// Fetches media over HTTP(S), or from disk for `file://` URLs.
#[derive(Debug, Clone)]
pub struct HttpMediaTransport {
    client: Client,
}

impl HttpMediaTransport {
    /// Creates transport from HTTP settings.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &HttpConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MediaError::transfer(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_file(request: &AuthenticatedRequest) -> Result<TransferResponse, MediaError> {
        let path = request
            .url()
            .to_file_path()
            .map_err(|()| MediaError::transfer(format!("not a local path: {}", request.url())))?;

        let body = tokio::fs::read(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read local media");
            MediaError::transfer(format!("failed to read {}: {e}", path.display()))
        })?;

        Ok(TransferResponse {
            body: Some(Bytes::from(body)),
            content_type: None,
        })
    }
}

#[async_trait]
impl MediaTransport for HttpMediaTransport {
    async fn fetch(&self, request: AuthenticatedRequest) -> Result<TransferResponse, MediaError> {
        if request.url().scheme() == "file" {
            return Self::read_file(&request).await;
        }

        debug!(url = %request.url(), authenticated = request.is_authenticated(), "GET media");

        let response = self
            .client
            .get(request.url().clone())
            .headers(request.headers().clone())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Media request failed");
                MediaError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::http_status(
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .bytes()
            .await
            .map_err(|e| MediaError::transfer(format!("failed to read body: {e}")))?;

        Ok(TransferResponse {
            body: (!body.is_empty()).then_some(body),
            content_type,
        })
    }
}
