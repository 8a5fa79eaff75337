use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, instrument, trace};

/// Per-slice wall-clock budget. Roughly one frame at 60Hz, minus headroom
/// for whatever the host wants to do between slices.
const DEFAULT_SLICE_BUDGET: Duration = Duration::from_millis(14);

/// Minimum interval between progress publications.
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Batch completion state, published between slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

/// Cooperative cancellation for a running batch. Cheap to clone; aborting
/// takes effect at the next slice boundary, never mid-slice.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    Complete(Vec<R>),
    /// Torn down before completion; partial output is discarded.
    Aborted,
}

impl<R> Outcome<R> {
    pub fn into_complete(self) -> Option<Vec<R>> {
        match self {
            Self::Complete(results) => Some(results),
            Self::Aborted => None,
        }
    }
}

/// Slice-internal bookkeeping: cursor, output prefix and the calibrated
/// items-per-slice estimate. Owned by one run, mutated only inside a
/// slice.
struct SliceState<R> {
    done: usize,
    outputs: Vec<R>,
    per_slice: Option<usize>,
}

/// Drives a batch of step calls in bounded time slices.
///
/// One scheduler instance drives one batch at a time; progress and abort
/// handles can be taken before the run starts and observed from elsewhere.
#[derive(Debug)]
pub struct Scheduler {
    budget: Duration,
    progress_interval: Duration,
    progress: watch::Sender<Progress>,
    abort: AbortHandle,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_SLICE_BUDGET)
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress: watch::Sender::new(Progress::default()),
            abort: AbortHandle::default(),
        }
    }

    /// Publish progress on every slice instead of throttling.
    pub fn with_unthrottled_progress(mut self) -> Self {
        self.progress_interval = Duration::ZERO;
        self
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Process `items` strictly in order, yielding to the executor between
    /// slices so this never monopolizes its thread.
    #[instrument(skip_all, fields(total = items.len(), budget_ms = self.budget.as_millis() as u64))]
    pub async fn run<T, R>(&self, items: Vec<T>, mut step: impl FnMut(T) -> R) -> Outcome<R> {
        let total = items.len();
        let mut state =
            SliceState { done: 0, outputs: Vec::with_capacity(total), per_slice: None };
        let mut input = items.into_iter();
        let mut last_published = Instant::now();
        self.progress.send_replace(Progress { done: 0, total });

        while state.done < total {
            // Liveness check once per slice: teardown discards the partial
            // prefix, it never surfaces.
            if self.abort.is_aborted() {
                debug!(done = state.done, total, "batch aborted");
                return Outcome::Aborted;
            }

            let slice_start = Instant::now();
            let processed = match state.per_slice {
                // Calibration slice: clock checked after every item.
                None => {
                    let mut processed = 0;
                    for item in input.by_ref() {
                        state.outputs.push(step(item));
                        processed += 1;
                        if slice_start.elapsed() >= self.budget {
                            break;
                        }
                    }
                    processed
                }
                // Calibrated slice: run the estimate without per-item checks.
                Some(count) => {
                    let mut processed = 0;
                    for item in input.by_ref().take(count) {
                        state.outputs.push(step(item));
                        processed += 1;
                    }
                    processed
                }
            };
            state.done += processed;
            state.per_slice = Some(estimate_per_slice(processed, self.budget, slice_start.elapsed()));
            trace!(done = state.done, per_slice = state.per_slice, "slice complete");

            if last_published.elapsed() >= self.progress_interval {
                self.progress.send_replace(Progress { done: state.done, total });
                last_published = Instant::now();
            }
            tokio::task::yield_now().await;
        }

        self.progress.send_replace(Progress { done: total, total });
        Outcome::Complete(state.outputs)
    }
}

/// Items-per-slice proportional to budget/elapsed, recomputed after every
/// slice. Never below one, or the batch would stall.
fn estimate_per_slice(processed: usize, budget: Duration, elapsed: Duration) -> usize {
    let scaled = (processed as u128 * budget.as_nanos()) / elapsed.as_nanos().max(1);
    usize::try_from(scaled).unwrap_or(usize::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let scheduler = Scheduler::new();
        let items: Vec<usize> = (0..1000).collect();
        let outcome = scheduler.run(items, |i| i * 2).await;
        let results = outcome.into_complete().expect("batch should complete");
        assert_eq!(results.len(), 1000);
        for (index, result) in results.iter().enumerate() {
            assert_eq!(*result, index * 2);
        }
    }

    #[tokio::test]
    async fn empty_batch_completes_immediately() {
        let scheduler = Scheduler::new();
        let outcome = scheduler.run(Vec::<u32>::new(), |i| i).await;
        assert_eq!(outcome, Outcome::Complete(Vec::new()));
        assert_eq!(*scheduler.progress().borrow(), Progress { done: 0, total: 0 });
    }

    #[tokio::test]
    async fn progress_is_published_and_reaches_total() {
        let scheduler = Scheduler::with_budget(Duration::from_millis(2)).with_unthrottled_progress();
        let mut progress = scheduler.progress();
        let items: Vec<u32> = (0..40).collect();
        let outcome = scheduler
            .run(items, |i| {
                std::thread::sleep(Duration::from_millis(1));
                i
            })
            .await;
        assert!(outcome.into_complete().is_some());
        assert!(progress.has_changed().unwrap());
        assert_eq!(*progress.borrow_and_update(), Progress { done: 40, total: 40 });
    }

    #[tokio::test]
    async fn no_calibrated_slice_greatly_exceeds_the_budget() {
        // Fast items, small budget: every slice after calibration should
        // stay within ~2x budget. Measured from inside the step function
        // by tracking the longest uninterrupted run between yields.
        let budget = Duration::from_millis(5);
        let scheduler = Scheduler::with_budget(budget);
        let slice_spans: Arc<std::sync::Mutex<Vec<Instant>>> = Arc::default();
        let spans = Arc::clone(&slice_spans);
        let items: Vec<u32> = (0..5000).collect();
        scheduler
            .run(items, move |i| {
                spans.lock().unwrap().push(Instant::now());
                std::hint::black_box(i)
            })
            .await
            .into_complete()
            .expect("batch should complete");

        let stamps = slice_spans.lock().unwrap();
        let mut slice_start = stamps[0];
        let mut max_slice = Duration::ZERO;
        for pair in stamps.windows(2) {
            // A gap an order of magnitude above the per-item cost marks a
            // yield boundary.
            if pair[1] - pair[0] > Duration::from_millis(1) {
                max_slice = max_slice.max(pair[0] - slice_start);
                slice_start = pair[1];
            }
        }
        max_slice = max_slice.max(*stamps.last().unwrap() - slice_start);
        assert!(
            max_slice < budget * 3,
            "longest slice {max_slice:?} exceeded budget {budget:?} by more than 3x",
        );
    }

    #[tokio::test]
    async fn abort_stops_stepping_at_the_next_slice_boundary() {
        let scheduler = Scheduler::with_budget(Duration::from_millis(2));
        let abort = scheduler.abort_handle();
        let steps = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&steps);
        let items: Vec<u32> = (0..10_000).collect();
        let task = tokio::spawn(async move {
            scheduler
                .run(items, move |i| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_micros(500));
                    i
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        abort.abort();
        let outcome = task.await.unwrap();
        assert_eq!(outcome, Outcome::Aborted);

        let at_abort = steps.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(steps.load(Ordering::SeqCst), at_abort, "steps continued after abort");
    }
}
