//! Cooperative time-sliced batch processing.
//!
//! Large normalization batches share their thread with interactive work,
//! so the scheduler processes items in bounded wall-clock slices and
//! yields between them. The first slice calibrates by checking the clock
//! after every item; later slices run a pre-computed item count without
//! per-item checks and recalibrate continuously from the measured elapsed
//! time. Output order is always a strict prefix of the input order.

mod scheduler;

pub use crate::scheduler::{AbortHandle, Outcome, Progress, Scheduler};
