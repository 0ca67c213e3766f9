//! Editor attachment kinds and their placeholder icons.

use url::Url;

use super::TargetSize;

/// URL marking an image attachment that is really a document upload.
pub const DOCUMENT_UPLOADING_URL: &str = "documentUploading://";

/// Attachment embedded in editor content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Image attachment with its current URL.
    Image {
        /// Current URL, if already known.
        url: Option<Url>,
    },
    /// Video attachment.
    Video,
    /// Anything else.
    Other,
}

/// Icon drawn while an attachment is unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderIcon {
    /// Document being uploaded.
    Pages,
    /// Generic image.
    Image,
    /// Video.
    Video,
    /// Generic attachment.
    Attachment,
}

impl PlaceholderIcon {
    /// Returns the icon name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Image => "image",
            Self::Video => "video",
            Self::Attachment => "attachment",
        }
    }
}

/// Placeholder to render for an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Chosen icon.
    pub icon: PlaceholderIcon,
    /// Requested icon size.
    pub size: TargetSize,
    /// Tint color, if any.
    pub tint: Option<String>,
    /// Accessibility label for the icon.
    pub accessibility_label: &'static str,
}
