//! Typed post-source loading and the discovered-sources report.
//!
//! A blog folder may carry up to seven typed source files, each a JSON
//! array of raw records. Absent and present-but-empty files are reported
//! distinctly; a file that fails to parse even after repair contributes
//! zero records but still counts as loaded. Total failure therefore shows
//! up as an empty record list plus the report, never as an error.

use shoebox_archive::{ArchiveStore, FileInfo};
use shoebox_ingest::{MediaIndex, RawRecord, parse_records};
use std::path::Path;
use tracing::warn;

/// The typed sources probed for every blog, in load order. Records are
/// concatenated in this order, so it is also the post order within a
/// batch.
pub const SOURCE_NAMES: [&str; 7] =
    ["texts", "images", "videos", "conversations", "answers", "quotes", "links"];

const SOURCE_EXTENSION: &str = "txt";

/// Alias spellings of the per-record downloaded-media list. Private-blog
/// exports use the underscore form.
const MEDIA_LIST_ALIASES: [&str; 2] = ["downloaded-media-files", "downloaded_media_files"];

/// What became of one probed source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// No such file in the blog folder.
    Missing,
    /// The file exists but holds no content.
    Empty,
    /// Parsed, contributing this many records (zero if unparseable).
    Loaded(usize),
}

/// Per-source outcome report for one blog, in probe order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredSources(Vec<(&'static str, SourceState)>);

impl DiscoveredSources {
    pub fn state(&self, name: &str) -> SourceState {
        self.0
            .iter()
            .find(|(source, _)| *source == name)
            .map_or(SourceState::Missing, |(_, state)| *state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, SourceState)> + '_ {
        self.0.iter().copied()
    }

    /// Total records contributed across all loaded sources.
    pub fn record_count(&self) -> usize {
        self.0
            .iter()
            .map(|(_, state)| match state {
                SourceState::Loaded(count) => *count,
                _ => 0,
            })
            .sum()
    }
}

/// Everything read out of one blog folder's typed sources.
pub(crate) struct SourceSet {
    pub report: DiscoveredSources,
    /// All records, concatenated in [`SOURCE_NAMES`] order.
    pub records: Vec<RawRecord>,
    /// Per-post-id local media filenames, from the images/videos sources.
    pub media: MediaIndex,
    /// Content fingerprint over the raw source bytes, for cache keying.
    pub fingerprint: String,
}

/// Probe and load the typed sources of one blog folder. `listing` is the
/// folder's file listing, already fetched by the caller.
pub(crate) async fn load(
    store: &dyn ArchiveStore,
    folder: &Path,
    listing: &[FileInfo],
) -> SourceSet {
    let mut report = Vec::with_capacity(SOURCE_NAMES.len());
    let mut records = Vec::new();
    let mut media = MediaIndex::default();
    let mut hasher = blake3::Hasher::new();

    for name in SOURCE_NAMES {
        let file_name = format!("{name}.{SOURCE_EXTENSION}");
        // Every probed source folds its disposition into the fingerprint,
        // not just its bytes, so a file flipping between missing and empty
        // still changes the cache key and the cached report stays honest.
        hasher.update(name.as_bytes());
        let present = listing.iter().any(|file| file.file_name() == Some(file_name.as_str()));
        if !present {
            hasher.update(&[0]);
            report.push((name, SourceState::Missing));
            continue;
        }
        let path = folder.join(&file_name);
        let text = match store.read_text(&path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable source file");
                hasher.update(&[1]);
                report.push((name, SourceState::Loaded(0)));
                continue;
            }
        };
        if text.trim().is_empty() {
            hasher.update(&[2]);
            report.push((name, SourceState::Empty));
            continue;
        }
        hasher.update(&[3]);
        hasher.update(text.as_bytes());
        let parsed = parse_records(name, &text);
        report.push((name, SourceState::Loaded(parsed.len())));
        match name {
            "images" => index_media(&parsed, &mut media.images_by_post),
            "videos" => index_media(&parsed, &mut media.videos_by_post),
            _ => {}
        }
        records.extend(parsed);
    }

    SourceSet {
        report: DiscoveredSources(report),
        records,
        media,
        fingerprint: hasher.finalize().to_string(),
    }
}

fn index_media(
    records: &[RawRecord],
    by_post: &mut std::collections::HashMap<String, Vec<String>>,
) {
    for record in records {
        let Some(id) = record.id() else { continue };
        let files = record.text_list(&MEDIA_LIST_ALIASES);
        if !files.is_empty() {
            by_post.insert(id, files);
        }
    }
}
