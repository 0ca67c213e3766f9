//! Video source types.

use url::Url;

/// What the editor knows about a video attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaLocator {
    /// Managed-platform video identifier, if the video is hosted there.
    pub remote_video_id: Option<String>,
    /// Remote URL stored for the media, used for self-hosted sites.
    pub fallback_remote_url: Option<String>,
    /// Local upload identifier, for diagnostics.
    pub upload_id: Option<String>,
}

impl MediaLocator {
    /// Locator for a managed-platform video.
    #[must_use]
    pub fn managed(video_id: impl Into<String>) -> Self {
        Self {
            remote_video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    /// Locator for a self-hosted video URL.
    #[must_use]
    pub fn self_hosted(remote_url: impl Into<String>) -> Self {
        Self {
            fallback_remote_url: Some(remote_url.into()),
            ..Self::default()
        }
    }

    /// Attaches the upload identifier.
    #[must_use]
    pub fn with_upload_id(mut self, upload_id: impl Into<String>) -> Self {
        self.upload_id = Some(upload_id.into());
        self
    }
}

/// Raw strings returned by the video lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrls {
    /// Playable video URL.
    pub video_url: String,
    /// Poster image URL, if the service has one.
    pub poster_url: Option<String>,
}

/// Parsed video location ready for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    /// Playable video URL.
    pub video_url: Url,
    /// Poster image URL.
    pub poster_url: Option<Url>,
}
