//! Archive store trait and implementations.
//!
//! Archives are read-only by definition: the export tool wrote them, this
//! program only ever views them. The trait is therefore a listing/reading
//! interface with no mutation surface at all.

mod local;
#[cfg(feature = "mock")]
mod memory;

pub use self::local::LocalStore;
#[cfg(feature = "mock")]
pub use self::memory::MemoryStore;
use crate::error::{ErrorKind, Result};
use crate::models::FileInfo;
use async_trait::async_trait;
use std::path::Path;

/// Unified read-only interface over an archive's files.
///
/// All paths are relative to the archive root and are validated by
/// implementations via [`validate_path`](crate::validate_path).
// TODO: When `dyn async trait` stabilizes, migrate to native 2024 Edition async traits.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// List all files, recursively, optionally restricted to those whose
    /// relative path starts with `prefix` (component-wise).
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>>;

    /// Check whether a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read complete file contents. Returns
    /// [`NotFound`](crate::error::ErrorKind::NotFound) if the file does
    /// not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Get file metadata without reading contents.
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Read complete file contents as UTF-8 text.
    async fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes)
            .map_err(|_| exn::Exn::from(ErrorKind::NotUtf8(path.to_path_buf())))
    }
}
