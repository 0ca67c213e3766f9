//! Video source resolution use case.

use std::sync::Arc;

use tracing::{debug, error};
use url::Url;

use crate::domain::entities::{MediaLocator, VideoSource};
use crate::domain::errors::MediaError;
use crate::domain::ports::VideoLookupPort;

/// Resolves a video attachment to a playable URL and optional poster.
pub struct ResolveVideoSourceUseCase {
    lookup: Arc<dyn VideoLookupPort>,
}

impl ResolveVideoSourceUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(lookup: Arc<dyn VideoLookupPort>) -> Self {
        Self { lookup }
    }

    /// Resolves the locator.
    ///
    /// Without a managed-platform id the stored remote URL is used as is,
    /// with no poster. Otherwise the lookup service is asked once.
    ///
    /// # Errors
    /// Returns [`MediaError::Resolution`] if no usable video URL is found,
    /// or the lookup error if the service call fails.
    pub async fn execute(&self, locator: &MediaLocator) -> Result<VideoSource, MediaError> {
        let Some(video_id) = locator
            .remote_video_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        else {
            return Self::from_fallback(locator);
        };

        debug!(video_id, "Looking up managed video URLs");
        let urls = self.lookup.lookup_video_urls(video_id).await.map_err(|e| {
            error!(video_id, error = %e, "Unable to find information for video");
            e
        })?;

        let video_url = Url::parse(&urls.video_url).map_err(|e| {
            error!(video_id, url = %urls.video_url, "Lookup returned an invalid video URL");
            MediaError::resolution(format!("invalid video URL {:?}: {e}", urls.video_url))
        })?;
        let poster_url = urls
            .poster_url
            .as_deref()
            .and_then(|poster| Url::parse(poster).ok());

        Ok(VideoSource {
            video_url,
            poster_url,
        })
    }

    fn from_fallback(locator: &MediaLocator) -> Result<VideoSource, MediaError> {
        match locator
            .fallback_remote_url
            .as_deref()
            .and_then(|remote| Url::parse(remote).ok())
        {
            Some(video_url) => Ok(VideoSource {
                video_url,
                poster_url: None,
            }),
            None => {
                error!(
                    upload_id = locator.upload_id.as_deref().unwrap_or("unknown"),
                    "Unable to find remote video URL"
                );
                Err(MediaError::resolution("no remote URL stored for video"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VideoUrls;
    use crate::domain::errors::MediaErrorKind;
    use crate::domain::ports::mocks::MockVideoLookupPort;
    use tokio_test::{assert_err, assert_ok};

    fn use_case(lookup: MockVideoLookupPort) -> ResolveVideoSourceUseCase {
        ResolveVideoSourceUseCase::new(Arc::new(lookup))
    }

    #[tokio::test]
    async fn test_fallback_url_skips_lookup() {
        let mut lookup = MockVideoLookupPort::new();
        lookup.expect_lookup_video_urls().times(0);

        let source = assert_ok!(
            use_case(lookup)
                .execute(&MediaLocator::self_hosted("https://self.example.org/v.mp4"))
                .await
        );

        assert_eq!(source.video_url.as_str(), "https://self.example.org/v.mp4");
        assert!(source.poster_url.is_none());
    }

    #[tokio::test]
    async fn test_missing_fallback_is_resolution_error() {
        let mut lookup = MockVideoLookupPort::new();
        lookup.expect_lookup_video_urls().times(0);

        let err = assert_err!(
            use_case(lookup)
                .execute(&MediaLocator::default().with_upload_id("upload-7"))
                .await
        );

        assert_eq!(err.kind(), MediaErrorKind::Resolution);
    }

    #[tokio::test]
    async fn test_lookup_returns_video_and_poster() {
        let mut lookup = MockVideoLookupPort::new();
        lookup
            .expect_lookup_video_urls()
            .withf(|id: &str| id == "vp-123")
            .times(1)
            .returning(|_| {
                Ok(VideoUrls {
                    video_url: "https://videos.example.com/vp-123.mp4".to_string(),
                    poster_url: Some("https://videos.example.com/vp-123.jpg".to_string()),
                })
            });

        let source = assert_ok!(use_case(lookup).execute(&MediaLocator::managed("vp-123")).await);

        assert_eq!(source.video_url.as_str(), "https://videos.example.com/vp-123.mp4");
        assert_eq!(
            source.poster_url.map(String::from).as_deref(),
            Some("https://videos.example.com/vp-123.jpg")
        );
    }

    #[tokio::test]
    async fn test_malformed_video_url_is_resolution_error() {
        let mut lookup = MockVideoLookupPort::new();
        lookup.expect_lookup_video_urls().times(1).returning(|_| {
            Ok(VideoUrls {
                video_url: "not a url".to_string(),
                poster_url: None,
            })
        });

        let err = assert_err!(use_case(lookup).execute(&MediaLocator::managed("vp-1")).await);

        assert_eq!(err.kind(), MediaErrorKind::Resolution);
    }

    #[tokio::test]
    async fn test_malformed_poster_is_dropped() {
        let mut lookup = MockVideoLookupPort::new();
        lookup.expect_lookup_video_urls().times(1).returning(|_| {
            Ok(VideoUrls {
                video_url: "https://videos.example.com/a.mp4".to_string(),
                poster_url: Some("::bad::".to_string()),
            })
        });

        let source = assert_ok!(use_case(lookup).execute(&MediaLocator::managed("vp-2")).await);

        assert!(source.poster_url.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut lookup = MockVideoLookupPort::new();
        lookup
            .expect_lookup_video_urls()
            .times(1)
            .returning(|_| Err(MediaError::http_status(404, Some("Not Found"))));

        let err = assert_err!(use_case(lookup).execute(&MediaLocator::managed("gone")).await);

        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_blank_id_uses_fallback() {
        let mut lookup = MockVideoLookupPort::new();
        lookup.expect_lookup_video_urls().times(0);
        let locator = MediaLocator {
            remote_video_id: Some("  ".to_string()),
            fallback_remote_url: Some("https://self.example.org/b.mp4".to_string()),
            upload_id: None,
        };

        assert_ok!(use_case(lookup).execute(&locator).await);
    }
}
