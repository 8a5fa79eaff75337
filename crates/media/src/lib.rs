//! Heuristic media-reference resolution.
//!
//! Export tools rename, re-scale and re-encode media at download time, so
//! a post's remote URL rarely names the file sitting on disk verbatim.
//! This crate maps an ordered list of candidate URLs to a local asset via
//! the downloaded-files index, with extension-equivalence fallbacks, and
//! degrades to remote-only rather than failing.

mod ext;
mod index;
mod resolve;

pub use crate::ext::{
    IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, all_media_extensions, alternative_extensions,
    alternative_file_names,
};
pub use crate::index::{AssetIndex, AssetIndexEntry};
pub use crate::resolve::{AssetCatalog, ResolvedMedia, resolve};
