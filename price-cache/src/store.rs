use crate::domain::CacheEntry;
use crate::ports::EntryStore;
use dashmap::DashMap;
use std::fmt::Debug;

/// DashMap-based entry store.
/// Sharded locking keeps writers to different keys from contending, and
/// every operation on a single key is atomic.
#[derive(Default)]
pub struct DashMapEntryStore {
    entries: DashMap<String, CacheEntry>,
}

impl DashMapEntryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create a store sized for roughly `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }
}

impl EntryStore for DashMapEntryStore {
    fn load(&self, item_code: &str) -> Option<CacheEntry> {
        // copy out so no shard lock outlives the call
        self.entries.get(item_code).map(|entry| *entry.value())
    }

    fn store(&self, item_code: &str, entry: CacheEntry) {
        self.entries.insert(item_code.to_string(), entry);
    }

    fn delete(&self, item_code: &str) -> bool {
        self.entries.remove(item_code).is_some()
    }

    fn evict(&self, item_code: &str, observed: &CacheEntry) -> bool {
        self.entries
            .remove_if(item_code, |_, current| {
                current.fetched_at == observed.fetched_at
            })
            .is_some()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

impl Debug for DashMapEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashMapEntryStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}
