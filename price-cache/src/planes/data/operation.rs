use async_trait::async_trait;
use shared::Result;

/// Read-through price lookups
#[async_trait]
pub trait PriceOperations: Send + Sync + 'static {
    /// Price for one item, served from cache while younger than `max_age`
    async fn get_price_for(&self, item_code: &str) -> Result<f64>;

    /// Prices for many items, resolved concurrently and returned in request
    /// order. Any failure fails the whole call with `Error::PartialBatch`.
    async fn get_prices_for(&self, item_codes: &[&str]) -> Result<Vec<f64>>;
}
