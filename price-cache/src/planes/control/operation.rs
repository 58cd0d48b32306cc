use crate::domain::CacheInfo;

/// Administrative operations on a price cache
pub trait CacheAdmin: Send + Sync + 'static {
    fn describe(&self) -> CacheInfo;

    /// Drop the entry for one item so the next lookup goes upstream
    fn invalidate(&self, item_code: &str) -> bool;

    fn clear(&self);
}
