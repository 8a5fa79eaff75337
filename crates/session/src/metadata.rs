//! Per-blog metadata records from the archive's `Index` folder.

use serde::Deserialize;
use shoebox_ingest::models::{BlogKind, Platform};

/// The export tool's per-blog settings dump. Only the fields the viewer
/// acts on are modelled; the record carries dozens more (crawler settings,
/// download counters) that deserialization ignores.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BlogMetadata {
    #[serde(rename = "Name")]
    pub name: String,
    /// Numeric blog classification; absent in some hand-edited archives.
    #[serde(rename = "BlogType", default)]
    pub blog_type: Option<i64>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Url", default)]
    pub url: Option<String>,
    #[serde(rename = "Posts", default)]
    pub posts: Option<u64>,
    /// Absolute path on the machine that ran the export tool. Only its
    /// last component is meaningful here; see [`folder_name`](Self::folder_name).
    #[serde(rename = "FileDownloadLocation", default)]
    pub file_download_location: Option<String>,
}

impl BlogMetadata {
    pub fn kind(&self) -> BlogKind {
        self.blog_type.map_or(BlogKind::Unknown, BlogKind::from_index)
    }

    pub fn platform(&self) -> Platform {
        self.kind().platform()
    }

    /// The blog's folder name inside the archive root: the last component
    /// of the storage-location hint, or the blog's own name when the hint
    /// is absent or ends in a separator. The hint was written on another
    /// machine, so both separator styles must be handled regardless of the
    /// current platform.
    pub fn folder_name(&self) -> Option<&str> {
        let located = self.file_download_location.as_deref().and_then(|location| {
            let cut = location.rfind(['/', '\\']).map_or(0, |index| index + 1);
            let name = &location[cut..];
            (!name.is_empty()).then_some(name)
        });
        located.or_else(|| (!self.name.is_empty()).then_some(self.name.as_str()))
    }
}
