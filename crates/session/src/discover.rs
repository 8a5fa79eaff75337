//! Blog discovery from the archive's `Index` folder.
//!
//! Each non-`_files` file in `Index/` is one blog's metadata record; its
//! sibling `<name>_files.<ext>` is that blog's asset index. Unreadable or
//! unparseable records are skipped with a warning, never fatal, so one
//! corrupt export does not hide the rest of the archive.

use crate::error::{ErrorKind, Result};
use crate::metadata::BlogMetadata;
use shoebox_archive::ArchiveStore;
use shoebox_media::AssetIndex;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the metadata folder at the archive root.
pub const INDEX_FOLDER: &str = "Index";

/// Filename marker distinguishing asset-index records from metadata.
const ASSET_INDEX_MARKER: &str = "_files";

/// A blog found in the index, not yet loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredBlog {
    pub metadata: BlogMetadata,
    pub metadata_path: PathBuf,
}

impl DiscoveredBlog {
    /// Path of the sibling asset-index record (`someblog_files.json` next
    /// to `someblog.json`).
    pub fn asset_index_path(&self) -> Option<PathBuf> {
        let stem = self.metadata_path.file_stem()?.to_str()?;
        let extension = self.metadata_path.extension()?.to_str()?;
        Some(
            self.metadata_path
                .with_file_name(format!("{stem}{ASSET_INDEX_MARKER}.{extension}")),
        )
    }
}

/// Enumerate the blogs in the archive, sorted by name.
pub async fn discover_blogs(store: &dyn ArchiveStore) -> Result<Vec<DiscoveredBlog>> {
    let listing =
        store.list(Some(Path::new(INDEX_FOLDER))).await.map_err(ErrorKind::archive)?;
    let mut blogs = Vec::new();
    for file in listing {
        let Some(name) = file.file_name() else { continue };
        if name.contains(ASSET_INDEX_MARKER) {
            continue;
        }
        let text = match store.read_text(&file.path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %file.path.display(), error = %err, "skipping unreadable blog metadata");
                continue;
            }
        };
        match serde_json::from_str::<BlogMetadata>(&text) {
            Ok(metadata) => blogs.push(DiscoveredBlog { metadata, metadata_path: file.path }),
            Err(err) => {
                warn!(path = %file.path.display(), error = %err, "skipping unparseable blog metadata");
            }
        }
    }
    blogs.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
    Ok(blogs)
}

/// Load a blog's asset index. Missing or malformed records degrade to an
/// empty index; media resolution then simply finds no local matches.
pub async fn load_asset_index(store: &dyn ArchiveStore, blog: &DiscoveredBlog) -> AssetIndex {
    let Some(path) = blog.asset_index_path() else {
        return AssetIndex::default();
    };
    let text = match store.read_text(&path).await {
        Ok(text) => text,
        Err(err) => {
            warn!(blog = blog.metadata.name, error = %err, "no asset index for blog");
            return AssetIndex::default();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|err| {
        warn!(blog = blog.metadata.name, error = %err, "malformed asset index for blog");
        AssetIndex::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoebox_archive::MemoryStore;
    use shoebox_ingest::models::Platform;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.put(
            "Index/someblog.json",
            r#"{"Name": "someblog", "BlogType": 0, "FileDownloadLocation": "C:\\Backups\\someblog"}"#,
        );
        store.put(
            "Index/someblog_files.json",
            r#"{"Entries": [{"F": "tool_1.jpg", "L": "local_1.jpg", "O": "online_1.jpg"}]}"#,
        );
        store.put("Index/zeta.json", r#"{"Name": "zeta", "BlogType": 8}"#);
        store.put("Index/broken.json", "{{{not json");
        store
    }

    #[tokio::test]
    async fn discovery_skips_asset_indexes_and_unparseable_records() {
        let store = seeded_store();
        let blogs = discover_blogs(&store).await.unwrap();
        assert_eq!(blogs.len(), 2);
        assert_eq!(blogs[0].metadata.name, "someblog");
        assert_eq!(blogs[0].metadata.platform(), Platform::Tumblr);
        assert_eq!(blogs[1].metadata.name, "zeta");
        assert_eq!(blogs[1].metadata.platform(), Platform::Bluesky);
    }

    #[tokio::test]
    async fn asset_index_is_loaded_from_the_sibling_record() {
        let store = seeded_store();
        let blogs = discover_blogs(&store).await.unwrap();
        let index = load_asset_index(&store, &blogs[0]).await;
        assert_eq!(index.entries.len(), 1);
        assert_eq!(index.entries[0].online_name, "online_1.jpg");
        // zeta has no sibling record at all.
        let empty = load_asset_index(&store, &blogs[1]).await;
        assert!(empty.entries.is_empty());
    }

    #[tokio::test]
    async fn empty_archive_discovers_nothing() {
        let store = MemoryStore::new();
        assert!(discover_blogs(&store).await.unwrap().is_empty());
    }
}
