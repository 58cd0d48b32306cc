//! Read-through price cache with per-entry time-to-live.

pub mod clock;
pub mod domain;
pub mod events;
pub mod planes;
pub mod ports;
pub mod stats;
pub mod store;

#[cfg(test)]
mod testing;

pub use clock::{ManualClock, SystemClock};
pub use domain::{CacheConfig, CacheEntry, CacheInfo};
pub use events::PriceEvent;
pub use planes::control::CacheAdmin;
pub use planes::data::{PriceOperations, TransparentCache};
pub use ports::{Clock, EntryStore, PriceService};
pub use store::DashMapEntryStore;
