//! Entry store adapters for the price cache.

mod moka_cache;

pub use moka_cache::MokaEntryStore;
