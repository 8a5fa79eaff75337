use std::path::PathBuf;
use time::UtcDateTime;

/// Metadata for one file in an archive, path relative to the archive root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: UtcDateTime,
}

impl FileInfo {
    pub fn new(path: PathBuf, size: u64, modified: UtcDateTime) -> Self {
        Self { path, size, modified }
    }

    /// Final path component as UTF-8, if it is any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}
