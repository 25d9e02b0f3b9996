//! Read-through cache for point lookups.
//!
//! Misses are loaded while holding the cache entry's lock. Writers must
//! release the store's lock on a record before calling
//! [`ReadCache::invalidate`] for it; with that ordering an invalidation
//! either waits for an in-flight load and removes its result, or runs first
//! and the load then sees the new store state. A stale record can never be
//! left behind.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Transaction;

#[derive(Default)]
pub struct ReadCache {
    entries: DashMap<String, Transaction>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cached record for `id`, or loads it with `load` and caches
    /// it. Absent records are not cached.
    pub fn get<F>(&self, id: &str, load: F) -> Option<Transaction>
    where
        F: FnOnce(&str) -> Option<Transaction>,
    {
        if let Some(cached) = self.entries.get(id) {
            self.record_hit(id);
            return Some(cached.value().clone());
        }

        match self.entries.entry(id.to_owned()) {
            // Populated by a concurrent reader since the check above
            Entry::Occupied(entry) => {
                self.record_hit(id);
                Some(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                self.record_miss(id);
                let loaded = load(id)?;
                entry.insert(loaded.clone());
                Some(loaded)
            }
        }
    }

    fn record_hit(&self, id: &str) {
        let hits = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
        let misses = self.misses.load(Ordering::Relaxed);
        tracing::debug!(%id, hits, misses, "cache hit");
    }

    fn record_miss(&self, id: &str) {
        let misses = self.misses.fetch_add(1, Ordering::Relaxed) + 1;
        let hits = self.hits.load(Ordering::Relaxed);
        tracing::debug!(%id, hits, misses, "cache miss");
    }

    pub fn invalidate(&self, id: &str) {
        self.entries.remove(id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
