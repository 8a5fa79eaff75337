use super::{Payload, Platform, PostKind};
use time::UtcDateTime;

/// The generic body shared by every post type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    /// Cleaned body text (undoubled, noise-stripped, trimmed).
    pub content: String,
    /// Set when a structured photo payload was extracted, so the raw body's
    /// embedded photo markup isn't rendered a second time.
    pub is_disabled: bool,
    /// Whether the rendering layer should list the post's downloaded media
    /// files below the body. Suppressed when the body already appears to
    /// embed media inline.
    pub show_media_files: bool,
}

/// Local media filenames associated with a post (keyed by post id in the
/// typed "images"/"videos" sources).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaFiles {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}
impl MediaFiles {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

/// The unified, platform-agnostic post representation.
///
/// Produced once by normalization and immutable afterwards. The
/// [`Payload`] variant always matches `kind` — see
/// [`PostKind::matches`](super::PostKind::matches), which normalization
/// guarantees and tests assert.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalPost {
    pub platform: Platform,
    pub kind: PostKind,
    pub id: Option<String>,
    pub created_at: Option<UtcDateTime>,
    pub title: Option<String>,
    /// Canonicalized permalink.
    pub url: Option<String>,
    pub tags: Vec<String>,
    pub body: Body,
    pub payload: Payload,
    pub media_files: MediaFiles,
    pub summary: Option<String>,
    pub reblogged_from: Option<String>,
    pub reblogged_root: Option<String>,
}
impl CanonicalPost {
    /// The minimal fallback post: what an unhandled platform or an
    /// unparseable record degrades to instead of failing the batch.
    pub fn minimal(platform: Platform) -> Self {
        Self {
            platform,
            kind: PostKind::Regular,
            id: None,
            created_at: None,
            title: None,
            url: None,
            tags: Vec::new(),
            body: Body::default(),
            payload: Payload::None,
            media_files: MediaFiles::default(),
            summary: None,
            reblogged_from: None,
            reblogged_root: None,
        }
    }
}
