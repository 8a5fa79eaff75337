//! Session-scoped result caching.
//!
//! Partitions are explicitly constructed and explicitly cleared; nothing
//! in here is global or ambient. A session owns its partitions, hands them
//! out by reference, and clears them wholesale when the underlying archive
//! is reloaded.

mod inflight;
mod partition;

pub use crate::inflight::AsyncPartition;
pub use crate::partition::Partition;
