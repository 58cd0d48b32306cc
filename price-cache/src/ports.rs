#![deny(clippy::all)]

use crate::domain::CacheEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::LookupError;

// Ports are the pluggable extension points around the cache core

/// Port for the slow, fallible upstream price lookup.
/// Must be safe to call from many tasks at once.
#[async_trait]
pub trait PriceService: Send + Sync + 'static {
    async fn get_price_for(&self, item_code: &str) -> std::result::Result<f64, LookupError>;
}

/// Port for the concurrent entry storage (e.g., DashMap, Moka).
/// Operations are in-memory and never wait on upstream.
pub trait EntryStore: Send + Sync + 'static {
    fn load(&self, item_code: &str) -> Option<CacheEntry>;

    /// Unconditional overwrite, last writer wins
    fn store(&self, item_code: &str, entry: CacheEntry);

    fn delete(&self, item_code: &str) -> bool;

    /// Remove the mapping only if it still holds `observed`
    fn evict(&self, item_code: &str, observed: &CacheEntry) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

/// Port for reading the current time
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}
