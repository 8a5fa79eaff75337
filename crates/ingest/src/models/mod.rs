mod kind;
mod payload;
mod platform;
mod post;

pub use self::kind::PostKind;
pub use self::payload::{
    AnswerInfo, ConversationInfo, LinkInfo, Payload, PhotoEntry, PhotoSet, QuoteInfo, Utterance, VideoInfo,
};
pub use self::platform::{BlogKind, Platform};
pub use self::post::{Body, CanonicalPost, MediaFiles};
