//! Sizing transform port definition.

use url::Url;

use crate::domain::entities::TargetSize;

/// Pure URL rewrites asking the server for a resized image.
///
/// Implementations return the input unchanged when it cannot be rewritten.
pub trait SizingTransform: Send + Sync {
    /// Size parameters for authenticated images. `size` is in pixels.
    fn private_sized_url(&self, size: TargetSize, url: &Url) -> Url;

    /// Public CDN resize. `size` is in points.
    fn public_sized_url(&self, size: TargetSize, url: &Url) -> Url;
}
