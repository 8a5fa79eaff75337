use crate::models::Payload;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The canonical post type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PostKind {
    #[default]
    Regular,
    Photo,
    Video,
    Quote,
    Answer,
    Conversation,
    Link,
}
impl PostKind {
    /// Returns `true` when the payload variant matches this type tag.
    pub fn matches(&self, payload: &Payload) -> bool {
        matches!(
            (self, payload),
            (Self::Regular, Payload::None)
                | (Self::Photo, Payload::Photo(_))
                | (Self::Video, Payload::Video(_))
                | (Self::Quote, Payload::Quote(_))
                | (Self::Answer, Payload::Answer(_))
                | (Self::Conversation, Payload::Conversation(_))
                | (Self::Link, Payload::Link(_))
        )
    }
}
impl FromStr for PostKind {
    type Err = std::convert::Infallible;

    /// Declared types outside the known set (including the legacy "text"
    /// spelling and absent values) fold into `Regular`; there is no payload
    /// extraction for them, so downgrading is lossless.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "photo" => Self::Photo,
            "video" => Self::Video,
            "quote" => Self::Quote,
            "answer" => Self::Answer,
            "conversation" => Self::Conversation,
            "link" => Self::Link,
            _ => Self::Regular,
        })
    }
}
impl Display for PostKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Regular => "regular",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Quote => "quote",
            Self::Answer => "answer",
            Self::Conversation => "conversation",
            Self::Link => "link",
        })
    }
}
