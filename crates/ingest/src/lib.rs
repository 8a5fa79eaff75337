//! Ingestion and normalization of archived social-media export files.
//!
//! Raw export files go in one end (tolerating the malformed JSON the
//! export tools actually produce), canonical posts come out the other.
//! Everything in between is pure: alias resolution, text cleanup,
//! timestamp disambiguation and payload extraction all happen without
//! I/O, so a batch of records normalizes deterministically.

mod clean;
mod consts;
pub mod error;
pub mod models;
mod normalize;
mod raw;
mod source;
mod timestamp;

pub use crate::clean::{cleanup, strip_noise, undouble};
pub use crate::normalize::{MediaIndex, NormalizeContext, normalize};
pub use crate::raw::RawRecord;
pub use crate::source::{parse_records, repair};
pub use crate::timestamp::parse_timestamp;
