use crate::domain::CacheInfo;
use crate::planes::control::operation::CacheAdmin;
use crate::planes::data::TransparentCache;
use tracing::info;

impl CacheAdmin for TransparentCache {
    fn describe(&self) -> CacheInfo {
        let stats = self.stats.snapshot();
        CacheInfo {
            max_age: self.config.max_age,
            entries: self.store.len(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            upstream_failures: stats.upstream_failures,
        }
    }

    fn invalidate(&self, item_code: &str) -> bool {
        let removed = self.store.delete(item_code);
        if removed {
            info!("Invalidated cached price for '{}'", item_code);
        }
        removed
    }

    fn clear(&self) {
        let entries = self.store.len();
        self.store.clear();
        info!("Cleared {} cached price(s)", entries);
    }
}
