//! Local filesystem archive store.

use crate::error::{ErrorKind, Result};
use crate::models::FileInfo;
use crate::path::validate as validate_path;
use crate::store::ArchiveStore;
use async_trait::async_trait;
use exn::ResultExt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use tokio::fs;

/// Archive rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Absolute path of the archive root.
    root: PathBuf,
}

impl LocalStore {
    /// Open an archive at an absolute root directory. The directory must
    /// already exist; archives are never created by this program.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() || !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn relative_path(&self, absolute: &Path) -> Result<PathBuf> {
        let relative = absolute.strip_prefix(&self.root).or_raise(|| {
            ErrorKind::StoreError(format!(
                "path `{}` is not within root `{}`",
                absolute.display(),
                self.root.display()
            ))
        })?;
        validate_path(relative)
    }

    fn file_info(path: &Path, metadata: &Metadata) -> Result<FileInfo> {
        let modified = metadata.modified().map_err(ErrorKind::Io)?;
        Ok(FileInfo::new(path.to_path_buf(), metadata.len(), UtcDateTime::from(modified)))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl ArchiveStore for LocalStore {
    async fn list(&self, prefix: Option<&Path>) -> Result<Vec<FileInfo>> {
        let validated_prefix = prefix.map(validate_path).transpose()?;
        // Walk from the prefix directory itself so listing one blog never
        // touches its siblings. A prefix naming a file or a not-yet-existing
        // leaf steps up one level instead; the component filter below
        // applies either way.
        let start = match validated_prefix.as_ref() {
            Some(pfx) => {
                let full = self.root.join(pfx);
                if fs::metadata(&full).await.is_ok_and(|meta| meta.is_dir()) {
                    full
                } else {
                    full.parent().map_or_else(|| self.root.clone(), Path::to_path_buf)
                }
            }
            None => self.root.clone(),
        };

        let mut files = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                // A prefix pointing at nothing is an empty listing, not an
                // error.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(Self::map_io_error(err, &current).into()),
            };
            while let Some(entry) =
                entries.next_entry().await.map_err(|e| Self::map_io_error(e, &current))?
            {
                let path = entry.path();
                let metadata =
                    entry.metadata().await.map_err(|e| Self::map_io_error(e, &path))?;
                let relative = self.relative_path(&path)?;
                if let Some(pfx) = validated_prefix.as_deref()
                    && !relative.starts_with(pfx)
                {
                    continue;
                }
                if metadata.is_dir() {
                    stack.push(path);
                } else if metadata.is_file() {
                    files.push(Self::file_info(&relative, &metadata)?);
                }
                // Anything else is most likely a broken symlink; drop it.
            }
        }
        Ok(files)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)?)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        Self::file_info(path, &metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(dir: &Path, path: &str, data: &[u8]) {
        let full = dir.join(path);
        fs::create_dir_all(full.parent().unwrap()).await.unwrap();
        fs::write(full, data).await.unwrap();
    }

    #[test]
    fn open_requires_existing_absolute_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalStore::open(temp_dir.path()).is_ok());
        assert!(LocalStore::open("relative/path").is_err());
        assert!(LocalStore::open(temp_dir.path().join("missing")).is_err());
    }

    #[tokio::test]
    async fn read_and_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), "someblog/texts.json", b"[]").await;
        let store = LocalStore::open(temp_dir.path()).unwrap();
        assert!(store.exists(Path::new("someblog/texts.json")).await.unwrap());
        assert!(!store.exists(Path::new("someblog/missing.json")).await.unwrap());
        assert_eq!(store.read(Path::new("someblog/texts.json")).await.unwrap(), b"[]");
        let err = store.read(Path::new("someblog/missing.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn list_recurses_and_honors_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), "Index/someblog.json", b"{}").await;
        seed(temp_dir.path(), "someblog/media/a.jpg", b"x").await;
        seed(temp_dir.path(), "someblog/texts.json", b"[]").await;
        let store = LocalStore::open(temp_dir.path()).unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let media = store.list(Some(Path::new("someblog/media"))).await.unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].path, Path::new("someblog/media/a.jpg"));
        assert_eq!(media[0].file_name(), Some("a.jpg"));

        let missing = store.list(Some(Path::new("nothere/sub"))).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn single_component_prefix_lists_only_that_folder() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), "Index/someblog.json", b"{}").await;
        seed(temp_dir.path(), "someblog/texts.json", b"[]").await;
        seed(temp_dir.path(), "someblog/media/a.jpg", b"x").await;
        let store = LocalStore::open(temp_dir.path()).unwrap();

        let blog = store.list(Some(Path::new("someblog"))).await.unwrap();
        assert_eq!(blog.len(), 2);
        assert!(blog.iter().all(|file| file.path.starts_with("someblog")));

        // A prefix naming a file exactly still lists that file.
        let exact = store.list(Some(Path::new("someblog/texts.json"))).await.unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].path, Path::new("someblog/texts.json"));

        let missing = store.list(Some(Path::new("nothere"))).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(temp_dir.path()).unwrap();
        assert!(store.read(Path::new("../etc/passwd")).await.is_err());
        assert!(store.stat(Path::new("a/../../b")).await.is_err());
    }

    #[tokio::test]
    async fn read_text_rejects_non_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed(temp_dir.path(), "bad.json", &[0xff, 0xfe, 0x00]).await;
        let store = LocalStore::open(temp_dir.path()).unwrap();
        let err = store.read_text(Path::new("bad.json")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotUtf8(_)));
    }
}
