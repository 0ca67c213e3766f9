//! Image URL sizing.

pub mod sizing;

pub use sizing::{CdnSizing, DEFAULT_CDN_HOST};
