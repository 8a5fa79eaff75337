//! Synchronous memoization partitions.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// A named associative store with get/put/clear-all semantics. Entries are
/// append-only between clears; a clear invalidates the whole partition at
/// once, never individual keys.
#[derive(Debug)]
pub struct Partition<K, V> {
    name: &'static str,
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Partition<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self { name, entries: Mutex::new(HashMap::new()) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).insert(key, value);
    }

    /// Memoize: the supplier runs only on a miss, under the partition lock,
    /// so it must be cheap and non-reentrant.
    pub fn get_or_compute(&self, key: K, supplier: impl FnOnce() -> V) -> V {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.entry(key).or_insert_with(supplier).clone()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::debug!(partition = self.name, dropped = entries.len(), "clearing cache partition");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
