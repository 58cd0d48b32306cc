use crate::clock::SystemClock;
use crate::domain::{CacheConfig, CacheEntry};
use crate::events::{LookupFailedEvent, PriceEvent, PriceEvictedEvent, PriceFetchedEvent};
use crate::planes::data::operation::PriceOperations;
use crate::ports::{Clock, EntryStore, PriceService};
use crate::stats::CacheStats;
use crate::store::DashMapEntryStore;
use async_trait::async_trait;
use chrono::TimeDelta;
use shared::{Error, ItemPrice, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Read-through cache in front of a slow price service.
/// Entries stay valid for `max_age` after they were fetched and are evicted
/// lazily, on the first lookup that finds them expired. Failures are never
/// cached. Two concurrent misses on the same item both go upstream.
///
/// Clones share the same store, statistics and upstream.
#[derive(Clone)]
pub struct TransparentCache {
    actual_price_service: Arc<dyn PriceService>,
    pub(crate) store: Arc<dyn EntryStore>,
    clock: Arc<dyn Clock>,
    pub(crate) config: CacheConfig,
    max_age: TimeDelta,
    pub(crate) stats: Arc<CacheStats>,
    event_broadcaster: Option<broadcast::Sender<PriceEvent>>,
}

impl TransparentCache {
    /// Create a cache backed by an in-memory DashMap store and the system clock
    pub fn new(actual_price_service: Arc<dyn PriceService>, config: CacheConfig) -> Result<Self> {
        let max_age = config.max_age_delta()?;
        Ok(Self {
            actual_price_service,
            store: Arc::new(DashMapEntryStore::new()),
            clock: Arc::new(SystemClock),
            config,
            max_age,
            stats: Arc::new(CacheStats::default()),
            event_broadcaster: None,
        })
    }

    pub fn with_store(mut self, store: Arc<dyn EntryStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_broadcaster(mut self, broadcaster: broadcast::Sender<PriceEvent>) -> Self {
        self.event_broadcaster = Some(broadcaster);
        self
    }

    pub fn max_age(&self) -> Duration {
        self.config.max_age
    }

    fn broadcast(&self, event: PriceEvent) {
        let Some(ref broadcaster) = self.event_broadcaster else {
            return;
        };
        let kind = event.kind();
        let item_code = event.item_code().to_string();
        match broadcaster.send(event) {
            Ok(subscriber_count) => {
                debug!(
                    "Broadcasted {} event for '{}' to {} subscriber(s)",
                    kind, item_code, subscriber_count
                );
            }
            Err(_) => {
                warn!("No subscribers for {} event on '{}'", kind, item_code);
            }
        }
    }
}

impl std::fmt::Debug for TransparentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransparentCache")
            .field("max_age", &self.config.max_age)
            .field("entries", &self.store.len())
            .finish()
    }
}

#[async_trait]
impl PriceOperations for TransparentCache {
    async fn get_price_for(&self, item_code: &str) -> Result<f64> {
        let now = self.clock.now();
        let mut expired = false;

        if let Some(entry) = self.store.load(item_code) {
            if entry.is_valid_at(now, self.max_age) {
                self.stats.record_hit();
                debug!("Cache hit for '{}' (fetched at {})", item_code, entry.fetched_at);
                return Ok(entry.price);
            }

            expired = true;
            if self.store.evict(item_code, &entry) {
                self.stats.record_eviction();
                debug!("Evicted expired price for '{}' (fetched at {})", item_code, entry.fetched_at);
                self.broadcast(PriceEvent::Evicted(PriceEvictedEvent {
                    item_code: item_code.to_string(),
                    fetched_at: entry.fetched_at,
                }));
            }
        }

        self.stats.record_miss();
        let price = match self.actual_price_service.get_price_for(item_code).await {
            Ok(price) => price,
            Err(source) => {
                self.stats.record_upstream_failure();
                warn!("Price lookup for '{}' failed: {}", item_code, source);
                self.broadcast(PriceEvent::LookupFailed(LookupFailedEvent {
                    item_code: item_code.to_string(),
                    reason: source.to_string(),
                }));
                return Err(Error::Upstream {
                    item_code: item_code.to_string(),
                    source,
                });
            }
        };

        // stamped with the time the lookup started, not when it returned
        let entry = CacheEntry::new(price, now);
        self.store.store(item_code, entry);
        debug!("Stored price {} for '{}'", price, item_code);

        let fetched = PriceFetchedEvent {
            item_code: item_code.to_string(),
            price,
            fetched_at: now,
        };
        self.broadcast(if expired {
            PriceEvent::Refreshed(fetched)
        } else {
            PriceEvent::Fetched(fetched)
        });

        Ok(price)
    }

    async fn get_prices_for(&self, item_codes: &[&str]) -> Result<Vec<f64>> {
        if item_codes.is_empty() {
            return Ok(Vec::new());
        }

        let requested = item_codes.len();
        let mut tasks = JoinSet::new();
        for (slot, item_code) in item_codes.iter().enumerate() {
            let cache = self.clone();
            let item_code = item_code.to_string();
            tasks.spawn(async move {
                let outcome = cache.get_price_for(&item_code).await;
                (slot, outcome)
            });
        }

        // Results land in the slot of their request, so order follows the input.
        let mut slots: Vec<Option<f64>> = vec![None; requested];
        let mut first_error: Option<Error> = None;
        let mut failed = 0;

        // Join everything; a failure does not cancel lookups already in flight.
        while let Some(joined) = tasks.join_next().await {
            let err = match joined {
                Ok((slot, Ok(price))) => {
                    slots[slot] = Some(price);
                    continue;
                }
                Ok((_, Err(err))) => err,
                Err(join_error) => {
                    Error::Internal(format!("price lookup task failed: {}", join_error))
                }
            };
            failed += 1;
            first_error.get_or_insert(err);
        }

        match first_error {
            None => Ok(slots.into_iter().flatten().collect()),
            Some(first) => {
                let collected: Vec<ItemPrice> = item_codes
                    .iter()
                    .zip(slots)
                    .filter_map(|(item_code, price)| price.map(|p| ItemPrice::new(*item_code, p)))
                    .collect();
                warn!(
                    "Batch lookup failed for {} of {} item(s): {}",
                    failed, requested, first
                );
                Err(Error::PartialBatch {
                    first: Box::new(first),
                    collected,
                    failed,
                    requested,
                })
            }
        }
    }
}
