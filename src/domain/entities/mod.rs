//! Domain entity definitions.

mod attachment;
mod credentials;
mod media;
mod request;
mod video;

pub use attachment::{Attachment, DOCUMENT_UPLOADING_URL, Placeholder, PlaceholderIcon};
pub use credentials::{AccessToken, BasicAuthCredentials};
pub use media::{
    DisplayMetrics, FetchId, FetchRequest, FetchedMedia, HostingContext, ResolvedUrl,
    SizingStrategy, TargetSize,
};
pub use request::AuthenticatedRequest;
pub use video::{MediaLocator, VideoSource, VideoUrls};
