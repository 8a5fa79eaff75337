//! Per-archive orchestration.
//!
//! A [`Session`] wraps one open archive: it discovers blogs from the
//! index, loads and normalizes their typed sources through the scheduler,
//! caches the results, and hands the rendering layer a media-resolution
//! lookup. Infrastructure failures surface as errors; per-record,
//! per-file and per-media problems degrade in place instead.

mod discover;
pub mod error;
mod metadata;
mod session;
mod sources;

pub use crate::discover::{DiscoveredBlog, INDEX_FOLDER, discover_blogs};
pub use crate::metadata::BlogMetadata;
pub use crate::session::{LoadedBlog, MediaLookup, PostPair, Session};
pub use crate::sources::{DiscoveredSources, SOURCE_NAMES, SourceState};
pub use shoebox_schedule::{AbortHandle, Outcome, Progress, Scheduler};
