//! Type-specific post payloads.
//!
//! Exactly one payload shape exists per post, selected by the record's
//! declared type. A sum type makes the "exactly one populated, all others
//! absent" invariant unrepresentable to violate, which is the whole point.

/// One photo in a photo post, with its candidate URLs ordered
/// most-preferred resolution first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoEntry {
    pub urls: Vec<String>,
    pub caption: Option<String>,
    /// Column span from the photoset layout string, where one was present.
    pub layout_span: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoSet {
    pub photos: Vec<PhotoEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoInfo {
    pub caption: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteInfo {
    pub quote: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerInfo {
    pub question: String,
    pub answer: String,
}

/// One turn in a chat/conversation post.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utterance {
    pub label: String,
    pub name: String,
    pub phrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversationInfo {
    pub title: Option<String>,
    pub utterances: Vec<Utterance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkInfo {
    pub url: String,
    pub text: String,
    pub description: String,
}

/// The one-of-N payload, matched against [`PostKind`](super::PostKind).
///
/// `Regular` posts carry no payload beyond the generic body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Payload {
    #[default]
    None,
    Photo(PhotoSet),
    Video(VideoInfo),
    Quote(QuoteInfo),
    Answer(AnswerInfo),
    Conversation(ConversationInfo),
    Link(LinkInfo),
}
impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
