//! Asynchronous memoization with duplicate-in-flight collapsing.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

enum Slot<V> {
    Ready(V),
    InFlight(Shared<BoxFuture<'static, V>>),
}

/// Like [`Partition`](crate::Partition), but for asynchronous suppliers:
/// at most one supplier execution is ever in flight per key, and
/// concurrent callers for the same key await that one shared computation
/// instead of re-triggering it.
pub struct AsyncPartition<K, V> {
    name: &'static str,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> AsyncPartition<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self { name, slots: Mutex::new(HashMap::new()) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &K) -> Option<V> {
        match self.slots.lock().unwrap_or_else(|p| p.into_inner()).get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Return the cached value for `key`, or run `supplier` to produce it.
    ///
    /// The supplier future is shared: if a second caller arrives while the
    /// first is still computing, both await the same execution. The lock is
    /// never held across an await point.
    pub async fn get_or_compute<F>(&self, key: K, supplier: F) -> V
    where
        F: Future<Output = V> + Send + 'static,
    {
        let shared = {
            let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
            match slots.get(&key) {
                Some(Slot::Ready(value)) => return value.clone(),
                Some(Slot::InFlight(shared)) => shared.clone(),
                None => {
                    let shared = supplier.boxed().shared();
                    slots.insert(key.clone(), Slot::InFlight(shared.clone()));
                    shared
                }
            }
        };
        let value = shared.await;
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        // A clear may have raced the computation; only publish the result
        // if this key's in-flight slot is still the one we awaited.
        if let Some(slot @ Slot::InFlight(_)) = slots.get_mut(&key) {
            *slot = Slot::Ready(value.clone());
        }
        value
    }

    /// Drop every entry, including computations still in flight. In-flight
    /// callers still receive their value, but it is not retained.
    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        tracing::debug!(partition = self.name, dropped = slots.len(), "clearing async cache partition");
        slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> std::fmt::Debug for AsyncPartition<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncPartition").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn concurrent_same_key_callers_share_one_execution() {
        let partition: Arc<AsyncPartition<String, usize>> = Arc::new(AsyncPartition::new("test"));
        let runs = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(2));

        let mut tasks = Vec::new();
        for _ in 0..2 {
            let partition = Arc::clone(&partition);
            let runs = Arc::clone(&runs);
            let barrier = Arc::clone(&barrier);
            tasks.push(tokio::spawn(async move {
                barrier.wait().await;
                partition
                    .get_or_compute("key".to_string(), async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        42
                    })
                    .await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), 42);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_sequential_call_is_served_from_cache() {
        let partition: AsyncPartition<u32, u32> = AsyncPartition::new("test");
        let runs = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let runs = Arc::clone(&runs);
            let value = partition
                .get_or_compute(7, async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    99
                })
                .await;
            assert_eq!(value, 99);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(partition.get(&7), Some(99));
    }

    #[tokio::test]
    async fn clear_forgets_completed_values() {
        let partition: AsyncPartition<u32, u32> = AsyncPartition::new("test");
        let runs = Arc::new(AtomicUsize::new(0));
        let supplier = |runs: Arc<AtomicUsize>| async move {
            runs.fetch_add(1, Ordering::SeqCst);
            1
        };
        partition.get_or_compute(1, supplier(Arc::clone(&runs))).await;
        partition.clear();
        assert!(partition.is_empty());
        partition.get_or_compute(1, supplier(Arc::clone(&runs))).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_forgets_in_flight_computations() {
        let partition: Arc<AsyncPartition<u32, u32>> = Arc::new(AsyncPartition::new("test"));
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let task = {
            let partition = Arc::clone(&partition);
            tokio::spawn(async move {
                partition
                    .get_or_compute(1, async move {
                        gate.await.ok();
                        5
                    })
                    .await
            })
        };
        while partition.is_empty() {
            tokio::task::yield_now().await;
        }

        partition.clear();
        release.send(()).unwrap();
        // The caller that was already waiting still receives its value,
        // but the cleared partition does not retain it.
        assert_eq!(task.await.unwrap(), 5);
        assert_eq!(partition.get(&1), None);

        let runs = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&runs);
        let value = partition
            .get_or_compute(1, async move {
                counted.fetch_add(1, Ordering::SeqCst);
                6
            })
            .await;
        assert_eq!(value, 6);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
