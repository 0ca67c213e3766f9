//! Chooses the URL actually fetched for a media request.

use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::{FetchRequest, ResolvedUrl, SizingStrategy};
use crate::domain::ports::SizingTransform;

/// Picks the sizing transform for a request's hosting context.
#[derive(Clone)]
pub struct UrlStrategy {
    transforms: Arc<dyn SizingTransform>,
}

impl UrlStrategy {
    /// Creates a strategy over the given transforms.
    #[must_use]
    pub fn new(transforms: Arc<dyn SizingTransform>) -> Self {
        Self { transforms }
    }

    /// Resolves the URL to fetch. First match wins:
    ///
    /// 1. local files are returned unchanged;
    /// 2. private managed content is sized in pixels;
    /// 3. self-hosted content with basic auth is sized in pixels;
    /// 4. everything else goes through the public CDN in points.
    ///
    /// The requested size always collapses to its largest dimension with
    /// height `0`, so the source aspect ratio is kept.
    #[must_use]
    pub fn resolve(&self, request: &FetchRequest) -> ResolvedUrl {
        let source = request.source_url();
        let size = request.target_size().aspect_preserving();
        let hosting = request.hosting();

        let resolved = if request.is_local_file() {
            ResolvedUrl::new(source.clone(), SizingStrategy::Unchanged)
        } else if hosting.is_managed_private() {
            let pixels = size.scaled_width(request.display_scale());
            ResolvedUrl::new(
                self.transforms.private_sized_url(pixels, source),
                SizingStrategy::PrivatePixel,
            )
        } else if hosting.is_self_hosted_basic_auth() {
            let pixels = size.scaled_width(request.display_scale());
            ResolvedUrl::new(
                self.transforms.private_sized_url(pixels, source),
                SizingStrategy::SelfHostedPixel,
            )
        } else {
            ResolvedUrl::new(
                self.transforms.public_sized_url(size, source),
                SizingStrategy::PublicPoint,
            )
        };

        trace!(
            source = %source,
            resolved = %resolved,
            strategy = %resolved.strategy(),
            "Resolved media URL"
        );
        resolved
    }
}

impl std::fmt::Debug for UrlStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlStrategy").finish_non_exhaustive()
    }
}
