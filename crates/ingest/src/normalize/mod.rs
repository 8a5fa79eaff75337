//! Record-to-canonical-post normalization.
//!
//! Dispatch is by platform: tumblr records get the full treatment
//! (payload extraction, cleanup, heuristics), the microblog platforms get
//! a plain regular post, and anything unrecognized degrades to the
//! minimal post instead of failing the batch.

mod tumblr;

use crate::models::{BlogKind, Body, CanonicalPost, MediaFiles, Platform};
use crate::raw::RawRecord;
use crate::timestamp::parse_timestamp;
use serde_json::Value;
use std::collections::HashMap;

/// Local media filenames per post id, built from the typed "images" and
/// "videos" source files.
#[derive(Debug, Clone, Default)]
pub struct MediaIndex {
    pub images_by_post: HashMap<String, Vec<String>>,
    pub videos_by_post: HashMap<String, Vec<String>>,
}
impl MediaIndex {
    pub fn for_post(&self, id: Option<&str>) -> MediaFiles {
        let Some(id) = id else {
            return MediaFiles::default();
        };
        MediaFiles {
            images: self.images_by_post.get(id).cloned().unwrap_or_default(),
            videos: self.videos_by_post.get(id).cloned().unwrap_or_default(),
        }
    }
}

/// Per-blog inputs that normalization branches on, alongside the record
/// itself.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub platform: Platform,
    pub blog_kind: BlogKind,
    pub media: &'a MediaIndex,
}

/// Produce the canonical post for one raw record. Deterministic, pure and
/// infallible; schema surprises downgrade rather than error.
pub fn normalize(record: &RawRecord, ctx: &NormalizeContext<'_>) -> CanonicalPost {
    match ctx.platform {
        Platform::Tumblr => tumblr::normalize(record, ctx),
        Platform::Bluesky => microblog_post(record, ctx, Platform::Bluesky),
        Platform::Twitter => microblog_post(record, ctx, Platform::Twitter),
        platform => CanonicalPost::minimal(platform),
    }
}

/// The shared shape for the single-text-field platforms: always a regular
/// post, body shown as-is, media listing always on.
fn microblog_post(record: &RawRecord, ctx: &NormalizeContext<'_>, platform: Platform) -> CanonicalPost {
    let id = record.id();
    let mut text = record.text(&["text"]).unwrap_or_default().to_string();
    if platform == Platform::Twitter {
        text = substitute_links(&text, record);
    }
    CanonicalPost {
        media_files: ctx.media.for_post(id.as_deref()),
        id,
        created_at: record.first(&["date"]).and_then(parse_timestamp),
        url: record.text(&["url"]).map(str::to_string),
        body: Body { content: text, is_disabled: false, show_media_files: true },
        ..CanonicalPost::minimal(platform)
    }
}

/// Twitter exports carry a short-URL to expanded-URL map alongside the
/// text; substitute each short form so bodies read as their real targets.
fn substitute_links(text: &str, record: &RawRecord) -> String {
    let Some(Value::Object(links)) = record.first(&["links"]) else {
        return text.to_string();
    };
    let mut replaced = text.to_string();
    for (short, expanded) in links {
        if let Value::String(expanded) = expanded {
            replaced = replaced.replacen(short, expanded, 1);
        }
    }
    replaced
}
