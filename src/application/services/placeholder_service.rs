//! Placeholder selection for unresolved attachments.

use crate::domain::entities::{
    Attachment, DOCUMENT_UPLOADING_URL, Placeholder, PlaceholderIcon, TargetSize,
};

/// Chooses the placeholder drawn while an attachment loads.
#[must_use]
pub fn placeholder_for(attachment: &Attachment, size: TargetSize, tint: Option<&str>) -> Placeholder {
    let (icon, accessibility_label) = match attachment {
        Attachment::Image { url } if is_document_upload(url.as_ref()) => {
            (PlaceholderIcon::Pages, "Document uploading")
        }
        Attachment::Image { .. } => (PlaceholderIcon::Image, "Image"),
        Attachment::Video => (PlaceholderIcon::Video, "Video"),
        Attachment::Other => (PlaceholderIcon::Attachment, "Attachment"),
    };

    Placeholder {
        icon,
        size,
        tint: tint.map(str::to_string),
        accessibility_label,
    }
}

fn is_document_upload(url: Option<&url::Url>) -> bool {
    url.is_some_and(|url| url.as_str().eq_ignore_ascii_case(DOCUMENT_UPLOADING_URL))
}
