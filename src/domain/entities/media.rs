//! Media request value objects.

use std::fmt;
use std::sync::Arc;

use url::Url;

/// Requested display size in points.
///
/// A height of `0` means "preserve the source aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSize {
    /// Width in points (or pixels once scaled).
    pub width: f64,
    /// Height in points, `0` to keep the aspect ratio.
    pub height: f64,
}

impl TargetSize {
    /// Creates a new target size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size constrained only by width, keeping the aspect ratio.
    #[must_use]
    pub const fn with_width(width: f64) -> Self {
        Self { width, height: 0.0 }
    }

    /// Returns the larger of both dimensions.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Collapses to a width-only constraint on the largest dimension.
    #[must_use]
    pub fn aspect_preserving(&self) -> Self {
        Self::with_width(self.max_dimension())
    }

    /// Returns a copy with the width multiplied by `scale`.
    #[must_use]
    pub fn scaled_width(&self, scale: f64) -> Self {
        Self {
            width: self.width * scale,
            height: self.height,
        }
    }

    /// Returns true if the height is the aspect-ratio sentinel.
    #[must_use]
    pub fn keeps_aspect_ratio(&self) -> bool {
        self.height <= 0.0
    }

    /// Width rounded to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn width_px(&self) -> u32 {
        self.width.max(0.0).round() as u32
    }

    /// Height rounded to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn height_px(&self) -> u32 {
        self.height.max(0.0).round() as u32
    }
}

/// Current display, used when the caller has no explicit size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
    /// Points to pixels factor.
    pub scale: f64,
}

impl DisplayMetrics {
    /// Target size bounded by the display's largest dimension.
    #[must_use]
    pub fn max_target_size(&self) -> TargetSize {
        TargetSize::with_width(self.width.max(self.height))
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scale: 2.0,
        }
    }
}

/// Where the content lives and which credentials apply to it.
///
/// Supplied by the caller and never mutated.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostingContext {
    /// Source is a file on the local device.
    pub is_file_local: bool,
    /// Site is hosted on the managed platform rather than self-hosted.
    pub is_hosted_on_managed_platform: bool,
    /// Site content requires authentication to view.
    pub is_private: bool,
    /// Basic auth credentials are stored for the self-hosted site.
    pub has_basic_auth_credentials: bool,
}

impl HostingContext {
    /// Public content with no credentials.
    #[must_use]
    pub const fn public() -> Self {
        Self {
            is_file_local: false,
            is_hosted_on_managed_platform: false,
            is_private: false,
            has_basic_auth_credentials: false,
        }
    }

    /// Private site on the managed platform.
    #[must_use]
    pub const fn managed_private() -> Self {
        Self {
            is_file_local: false,
            is_hosted_on_managed_platform: true,
            is_private: true,
            has_basic_auth_credentials: false,
        }
    }

    /// Self-hosted site protected with basic auth.
    #[must_use]
    pub const fn self_hosted_basic_auth() -> Self {
        Self {
            is_file_local: false,
            is_hosted_on_managed_platform: false,
            is_private: false,
            has_basic_auth_credentials: true,
        }
    }

    /// Local file on disk.
    #[must_use]
    pub const fn local_file() -> Self {
        Self {
            is_file_local: true,
            is_hosted_on_managed_platform: false,
            is_private: false,
            has_basic_auth_credentials: false,
        }
    }

    /// Managed platform content that needs an access token.
    #[must_use]
    pub const fn is_managed_private(&self) -> bool {
        self.is_hosted_on_managed_platform && self.is_private
    }

    /// Self-hosted content behind basic auth.
    #[must_use]
    pub const fn is_self_hosted_basic_auth(&self) -> bool {
        !self.is_hosted_on_managed_platform && self.has_basic_auth_credentials
    }
}

/// Immutable description of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    source_url: Url,
    target_size: TargetSize,
    display_scale: f64,
    hosting: HostingContext,
}

impl FetchRequest {
    /// Creates a new request.
    #[must_use]
    pub const fn new(
        source_url: Url,
        target_size: TargetSize,
        display_scale: f64,
        hosting: HostingContext,
    ) -> Self {
        Self {
            source_url,
            target_size,
            display_scale,
            hosting,
        }
    }

    /// URL of the media as stored in the post.
    #[must_use]
    pub const fn source_url(&self) -> &Url {
        &self.source_url
    }

    /// Requested display size in points.
    #[must_use]
    pub const fn target_size(&self) -> TargetSize {
        self.target_size
    }

    /// Display scale factor (points to pixels).
    #[must_use]
    pub const fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Hosting and credential flags.
    #[must_use]
    pub const fn hosting(&self) -> &HostingContext {
        &self.hosting
    }

    /// Returns true if the source is a local file.
    #[must_use]
    pub fn is_local_file(&self) -> bool {
        self.hosting.is_file_local || self.source_url.scheme() == "file"
    }
}

/// Which transformation produced a resolved URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingStrategy {
    /// Local file, returned unchanged.
    Unchanged,
    /// Managed private image sized in pixels.
    PrivatePixel,
    /// Self-hosted basic auth image sized in pixels.
    SelfHostedPixel,
    /// Public CDN resize in points.
    PublicPoint,
}

impl fmt::Display for SizingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::PrivatePixel => write!(f, "private-pixel"),
            Self::SelfHostedPixel => write!(f, "self-hosted-pixel"),
            Self::PublicPoint => write!(f, "public-point"),
        }
    }
}

/// The single URL actually fetched for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    url: Url,
    strategy: SizingStrategy,
}

impl ResolvedUrl {
    /// Creates a resolved URL.
    #[must_use]
    pub const fn new(url: Url, strategy: SizingStrategy) -> Self {
        Self { url, strategy }
    }

    /// Returns the URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the strategy that produced it.
    #[must_use]
    pub const fn strategy(&self) -> SizingStrategy {
        self.strategy
    }

    /// Consumes and returns the URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Short identifier for a fetch, used in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchId(String);

impl FetchId {
    /// Derives an id from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Successfully fetched and decoded media.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    /// URL the payload came from.
    pub url: Url,
    /// Decoded image.
    pub image: Arc<image::DynamicImage>,
    /// Size of the raw payload.
    pub byte_len: usize,
    /// Content type reported by the server, if any.
    pub content_type: Option<String>,
}

impl FetchedMedia {
    /// Width of the decoded image in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the decoded image in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
