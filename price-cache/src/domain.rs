use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::time::Duration;

/// One memoized upstream lookup
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub price: f64,
    /// When this price was obtained from upstream
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(price: f64, fetched_at: DateTime<Utc>) -> Self {
        Self { price, fetched_at }
    }

    /// An entry is valid while `now < fetched_at + max_age`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
        match self.fetched_at.checked_add_signed(max_age) {
            Some(expires_at) => now < expires_at,
            // past the representable range, never expires
            None => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub max_age: Duration, // shared by every key, fixed for the cache lifetime
}

impl CacheConfig {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub(crate) fn max_age_delta(&self) -> Result<TimeDelta> {
        TimeDelta::from_std(self.max_age).map_err(|e| {
            Error::Config(format!("max_age {:?} is out of range: {}", self.max_age, e))
        })
    }
}

impl From<&shared::config::Config> for CacheConfig {
    fn from(config: &shared::config::Config) -> Self {
        Self::new(config.max_age)
    }
}

/// Point-in-time view of a cache
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheInfo {
    pub max_age: Duration,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub upstream_failures: u64,
}
