//! Use case implementations.

mod resolve_video_source_use_case;

pub use resolve_video_source_use_case::ResolveVideoSourceUseCase;
