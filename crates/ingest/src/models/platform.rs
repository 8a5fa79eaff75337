use std::fmt::{Display, Formatter, Result as FmtResult};

/// The origin service whose export schema a record follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    Tumblr,
    Instagram,
    Twitter,
    NewTumbl,
    Bluesky,
    Unknown,
}
impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Tumblr => "tumblr",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::NewTumbl => "newtumbl",
            Self::Bluesky => "bluesky",
            Self::Unknown => "unknown",
        })
    }
}

/// The export tool's numeric blog classification.
///
/// Several distinct classifications share one platform (a private tumblr
/// export and a tag-search export both contain tumblr-schema records), so
/// this is kept separate from [`Platform`] instead of being collapsed into
/// it at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlogKind {
    Tumblr,
    TumblrPrivate,
    Instagram,
    Twitter,
    TumblrLikedBy,
    TumblrSearch,
    TumblrTagSearch,
    NewTumbl,
    Bluesky,
    All,
    Unknown,
}
impl BlogKind {
    /// Map the export tool's classification index. Out-of-range values are
    /// `Unknown` rather than an error; old exports contain some surprises.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Self::Tumblr,
            1 => Self::TumblrPrivate,
            2 => Self::Instagram,
            3 => Self::Twitter,
            4 => Self::TumblrLikedBy,
            5 => Self::TumblrSearch,
            6 => Self::TumblrTagSearch,
            7 => Self::NewTumbl,
            8 => Self::Bluesky,
            9 => Self::All,
            _ => Self::Unknown,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Tumblr
            | Self::TumblrPrivate
            | Self::TumblrLikedBy
            | Self::TumblrSearch
            | Self::TumblrTagSearch => Platform::Tumblr,
            Self::Instagram => Platform::Instagram,
            Self::Twitter => Platform::Twitter,
            Self::NewTumbl => Platform::NewTumbl,
            Self::Bluesky => Platform::Bluesky,
            Self::All | Self::Unknown => Platform::Unknown,
        }
    }

    /// Search-result dumps never embed media markup in raw bodies, so the
    /// media-listing suppression heuristic does not apply to them.
    pub fn is_search(&self) -> bool {
        matches!(self, Self::TumblrSearch)
    }
}
