//! Read-only access to archived export bundles.
//!
//! An archive is a user-selected directory tree written by an export tool:
//! an `Index/` folder of per-blog metadata, per-blog folders of typed post
//! source files, and downloaded media pools. This crate only ever reads.

pub mod error;
mod models;
mod path;
pub mod store;

pub use crate::models::FileInfo;
pub use crate::path::validate as validate_path;
pub use crate::store::ArchiveStore;
pub use crate::store::LocalStore;
#[cfg(feature = "mock")]
pub use crate::store::MemoryStore;
