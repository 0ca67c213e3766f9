//! Video lookup port definition.

use async_trait::async_trait;

use crate::domain::entities::VideoUrls;
use crate::domain::errors::MediaError;

/// Port resolving a managed-platform video id to playable URLs.
///
/// Single attempt, no cancellation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoLookupPort: Send + Sync {
    /// Looks up the video and poster URL strings for `video_id`.
    async fn lookup_video_urls(&self, video_id: &str) -> Result<VideoUrls, MediaError>;
}
