use moka::sync::Cache;
use price_cache::{CacheEntry, EntryStore};
use std::fmt::Debug;
use tracing::debug;

/// Moka-based entry store
/// Unbounded and without a Moka-side TTL: expiry stays with the price cache,
/// which evicts lazily on lookup.
pub struct MokaEntryStore {
    cache: Cache<String, CacheEntry>,
}

impl MokaEntryStore {
    pub fn new(name: &str) -> Self {
        Self {
            cache: Cache::builder().name(name).build(),
        }
    }

    /// Create a store pre-sized for roughly `capacity` items
    pub fn with_initial_capacity(name: &str, capacity: usize) -> Self {
        Self {
            cache: Cache::builder()
                .name(name)
                .initial_capacity(capacity)
                .build(),
        }
    }
}

impl EntryStore for MokaEntryStore {
    fn load(&self, item_code: &str) -> Option<CacheEntry> {
        self.cache.get(item_code)
    }

    fn store(&self, item_code: &str, entry: CacheEntry) {
        self.cache.insert(item_code.to_string(), entry);
    }

    fn delete(&self, item_code: &str) -> bool {
        self.cache.remove(item_code).is_some()
    }

    fn evict(&self, item_code: &str, observed: &CacheEntry) -> bool {
        // Load-compare-remove is not atomic here. A refetch landing between
        // the two steps can still be dropped, costing one extra upstream call.
        match self.cache.get(item_code) {
            Some(current) if current.fetched_at == observed.fetched_at => {
                self.cache.remove(item_code).is_some()
            }
            Some(_) => {
                debug!("Skipped eviction of '{}', entry was already refreshed", item_code);
                false
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        // entry_count is eventually consistent until pending tasks run
        self.cache.run_pending_tasks();
        self.cache.entry_count() as usize
    }

    fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Debug for MokaEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaEntryStore")
            .field("name", &self.cache.name())
            .finish()
    }
}
