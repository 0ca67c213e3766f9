//! REST video lookup against the managed platform API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::VideoUrls;
use crate::domain::errors::MediaError;
use crate::domain::ports::{CredentialStore, VideoLookupPort};
use crate::infrastructure::config::{ApiConfig, HttpConfig};

/// Response body of `GET /videos/<id>`.
#[derive(Debug, Deserialize)]
struct VideoResponse {
    original: Option<String>,
    poster: Option<String>,
}

/// Looks up video URLs via `GET <base>/videos/<id>`.
pub struct RestVideoLookup {
    client: Client,
    base_url: String,
    store: Option<Arc<dyn CredentialStore>>,
}

impl RestVideoLookup {
    /// Creates lookup client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api: &ApiConfig, http: &HttpConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| MediaError::transfer(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            store: None,
        })
    }

    /// Sends the stored access token with lookups.
    #[must_use]
    pub fn with_credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }
}

#[async_trait]
impl VideoLookupPort for RestVideoLookup {
    async fn lookup_video_urls(&self, video_id: &str) -> Result<VideoUrls, MediaError> {
        let url = format!("{}/videos/{}", self.base_url, urlencoding_path(video_id));
        debug!(video_id, "Requesting video metadata");

        let mut request = self.client.get(&url);
        if let Some(store) = &self.store {
            match store.access_token().await {
                Ok(Some(token)) => {
                    request = request.header(header::AUTHORIZATION, format!("Bearer {}", token.as_str()));
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Could not read access token for video lookup"),
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::http_status(
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let body: VideoResponse = response
            .json()
            .await
            .map_err(|e| MediaError::resolution(format!("failed to parse video metadata: {e}")))?;

        let video_url = body
            .original
            .filter(|s| !s.is_empty())
            .ok_or_else(|| MediaError::resolution(format!("no video URL for {video_id}")))?;

        Ok(VideoUrls {
            video_url,
            poster_url: body.poster.filter(|s| !s.is_empty()),
        })
    }
}

/// Encodes an id for use as one path segment.
fn urlencoding_path(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
