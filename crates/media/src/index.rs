//! The asset index shipped alongside each blog's media pool.

use serde::{Deserialize, Serialize};

/// One row of the downloaded-files index, correlating a remote URL's tail
/// filename with the file actually written to disk.
///
/// The single-letter keys are the export tool's own wire format: `F` is
/// the tool-internal filename, `L` the unchanged local filename, `O` the
/// original online filename. Any of the three may be absent or blank in
/// old indexes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetIndexEntry {
    #[serde(rename = "F", default)]
    pub tool_name: String,
    #[serde(rename = "L", default)]
    pub local_name: String,
    #[serde(rename = "O", default)]
    pub online_name: String,
}

/// The `<blog>_files.json` document shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetIndex {
    #[serde(rename = "Entries", default)]
    pub entries: Vec<AssetIndexEntry>,
}
