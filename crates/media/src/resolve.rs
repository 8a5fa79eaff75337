//! Mapping of remote media references to local assets.
//!
//! Resolution never fails: when nothing on disk matches, the result simply
//! carries no local name and the caller falls back to the remote URL.

use crate::ext::alternative_file_names;
use crate::index::AssetIndexEntry;
use std::collections::HashSet;
use tracing::trace;

/// The outcome of resolving one candidate set. `remote` is always the
/// highest-priority candidate, regardless of which candidate (if any)
/// matched locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedMedia {
    pub remote: Option<String>,
    pub local: Option<String>,
}

/// The local asset pool, queried by exact filename.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog(HashSet<String>);

impl AssetCatalog {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AssetCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(names: I) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

/// Resolve an ordered candidate list (most-preferred resolution first)
/// against the asset index and the local pool.
///
/// Candidates are tried strictly in order, and each one is tried in full
/// — exact filename first, then extension-widened names that tolerate
/// re-encoded files — before the next candidate is consulted. A preferred
/// resolution therefore wins even when only its widened form exists
/// locally. Within each attempt, index rows matched by online filename
/// rank above rows matched by local filename, and the raw URL tail is the
/// final fallback.
pub fn resolve(candidates: &[String], index: &[AssetIndexEntry], catalog: &AssetCatalog) -> ResolvedMedia {
    let remote = candidates.first().cloned();

    for candidate in candidates {
        if let Some(name) = exact_match(candidate, index, catalog) {
            return ResolvedMedia { remote, local: Some(name) };
        }
        if let Some(name) = widened_match(candidate, index, catalog) {
            trace!(candidate, local = %name, "matched under an equivalent extension");
            return ResolvedMedia { remote, local: Some(name) };
        }
    }
    ResolvedMedia { remote, local: None }
}

/// Substring after the last path separator (either flavor; old indexes
/// contain Windows-style paths).
fn url_tail(url: &str) -> &str {
    match memchr::memrchr2(b'/', b'\\', url.as_bytes()) {
        Some(position) => &url[position + 1..],
        None => url,
    }
}

fn matched_rows<'a>(
    tail: &str,
    index: &'a [AssetIndexEntry],
) -> (Option<&'a AssetIndexEntry>, Option<&'a AssetIndexEntry>) {
    // Two independent strategies: the row whose online filename matches
    // (the file was renamed at download time), and the row whose local
    // filename matches (it was not).
    let renamed = index.iter().find(|entry| entry.online_name == tail);
    let unchanged = index.iter().find(|entry| entry.local_name == tail);
    (renamed, unchanged)
}

fn exact_match(candidate: &str, index: &[AssetIndexEntry], catalog: &AssetCatalog) -> Option<String> {
    let tail = url_tail(candidate);
    let (renamed, unchanged) = matched_rows(tail, index);
    primary_names(tail, renamed, unchanged)
        .find(|name| catalog.contains(name))
        .map(str::to_string)
}

fn widened_match(candidate: &str, index: &[AssetIndexEntry], catalog: &AssetCatalog) -> Option<String> {
    let tail = url_tail(candidate);
    let (renamed, unchanged) = matched_rows(tail, index);
    extended_names(tail, renamed, unchanged)
        .flat_map(|name| alternative_file_names(name))
        .find(|name| catalog.contains(name))
}

fn primary_names<'a>(
    tail: &'a str,
    renamed: Option<&'a AssetIndexEntry>,
    unchanged: Option<&'a AssetIndexEntry>,
) -> impl Iterator<Item = &'a str> {
    let field = |entry: Option<&'a AssetIndexEntry>, get: fn(&AssetIndexEntry) -> &String| {
        entry.map(get).map(String::as_str).filter(|name| !name.is_empty())
    };
    [
        field(renamed, |e| &e.tool_name),
        field(renamed, |e| &e.local_name),
        field(renamed, |e| &e.online_name),
        field(unchanged, |e| &e.tool_name),
        field(unchanged, |e| &e.local_name),
        field(unchanged, |e| &e.online_name),
        Some(tail),
    ]
    .into_iter()
    .flatten()
}

/// The widened pass ranks tool-internal names last: they regularly share a
/// stem with an unrelated file under a different extension, so letting
/// them match early produces false positives.
fn extended_names<'a>(
    tail: &'a str,
    renamed: Option<&'a AssetIndexEntry>,
    unchanged: Option<&'a AssetIndexEntry>,
) -> impl Iterator<Item = &'a str> {
    let field = |entry: Option<&'a AssetIndexEntry>, get: fn(&AssetIndexEntry) -> &String| {
        entry.map(get).map(String::as_str).filter(|name| !name.is_empty())
    };
    [
        field(renamed, |e| &e.online_name),
        field(renamed, |e| &e.local_name),
        field(unchanged, |e| &e.online_name),
        field(unchanged, |e| &e.local_name),
        field(renamed, |e| &e.tool_name),
        field(unchanged, |e| &e.tool_name),
        Some(tail),
    ]
    .into_iter()
    .flatten()
}
