//! Bounded LRU cache of job-title classifications.
//!
//! An explicit cache object held in `AppState` and shared across requests,
//! replacing the original unbounded process-global map. Entries are keyed by
//! the raw title text and live until evicted; nothing is persisted, so a
//! restart starts cold.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{ClassificationResult, Confidence};

/// Default capacity when `TITLE_CACHE_CAPACITY` is not set.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

struct Slot {
    result: ClassificationResult,
    last_used: u64,
}

struct Inner {
    map: HashMap<String, Slot>,
    tick: u64,
}

/// Shared classification cache with least-recently-used eviction.
///
/// The mutex is held only for map operations, never across an await point.
/// Invariant: once a title is cached with `Confidence::High`, that entry is
/// authoritative for the rest of the process run; later inserts for the
/// same title are ignored.
pub struct TitleCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl TitleCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Looks up a title, refreshing its recency on hit.
    pub fn get(&self, title: &str) -> Option<ClassificationResult> {
        let mut inner = self.inner.lock().expect("title cache poisoned");
        inner.tick += 1;
        let tick = inner.tick;
        inner.map.get_mut(title).map(|slot| {
            slot.last_used = tick;
            slot.result.clone()
        })
    }

    /// Whether a title is cached. Counts as a use for eviction purposes.
    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Inserts a classification, evicting the least-recently-used entry if
    /// the cache is full. A `High` entry already present for the title is
    /// never overwritten.
    pub fn insert(&self, title: &str, result: ClassificationResult) {
        let mut inner = self.inner.lock().expect("title cache poisoned");

        if let Some(existing) = inner.map.get(title) {
            if existing.result.confidence == Confidence::High {
                return;
            }
        } else if inner.map.len() >= self.capacity {
            if let Some(lru_key) = inner
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone())
            {
                inner.map.remove(&lru_key);
            }
        }

        inner.tick += 1;
        let last_used = inner.tick;
        inner.map.insert(title.to_string(), Slot { result, last_used });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("title cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
