//! In-memory archive store for tests.

use crate::error::{ErrorKind, Result};
use crate::models::FileInfo;
use crate::path::validate as validate_path;
use crate::store::ArchiveStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::UtcDateTime;

/// Archive held entirely in memory. Seed it with [`put`](Self::put) and
/// hand it to anything expecting an [`ArchiveStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    // BTreeMap keeps listings deterministically ordered for assertions.
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) {
        let path = validate_path(path.as_ref()).expect("mock paths should be valid");
        self.files.lock().unwrap_or_else(|p| p.into_inner()).insert(path, data.into());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap_or_else(|p| p.into_inner()).remove(path.as_ref());
    }
}

#[async_trait]
impl ArchiveStore for MemoryStore {
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>> {
        let validated = prefix.map(validate_path).transpose()?;
        let files = self.files.lock().unwrap_or_else(|p| p.into_inner());
        Ok(files
            .iter()
            .filter(|(path, _)| validated.as_deref().is_none_or(|pfx| path.starts_with(pfx)))
            .map(|(path, data)| {
                FileInfo::new(path.clone(), data.len() as u64, UtcDateTime::UNIX_EPOCH)
            })
            .collect())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let validated = validate_path(path)?;
        Ok(self.files.lock().unwrap_or_else(|p| p.into_inner()).contains_key(&validated))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let validated = validate_path(path)?;
        self.files
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&validated)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.to_path_buf())))
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let validated = validate_path(path)?;
        let files = self.files.lock().unwrap_or_else(|p| p.into_inner());
        let data = files
            .get(&validated)
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path.to_path_buf())))?;
        Ok(FileInfo::new(validated, data.len() as u64, UtcDateTime::UNIX_EPOCH))
    }
}
