//! Poster frame extraction port definition.

use async_trait::async_trait;
use url::Url;

use crate::domain::errors::MediaError;

/// Port grabbing a still frame from a video to use as its poster.
#[async_trait]
pub trait PosterFrameExtractor: Send + Sync {
    /// Extracts a preview frame from the video at `source`.
    async fn extract_poster(&self, source: &Url) -> Result<image::DynamicImage, MediaError>;
}
