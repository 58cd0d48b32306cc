use async_trait::async_trait;
use price_cache::PriceService;
use rand::Rng;
use shared::LookupError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Stand-in for a remote pricing API: slow, and failing at a fixed rate
pub struct SimulatedPriceService {
    latency: Duration,
    failure_rate: f64,
    calls: AtomicU64,
}

impl SimulatedPriceService {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PriceService for SimulatedPriceService {
    async fn get_price_for(&self, item_code: &str) -> Result<f64, LookupError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        // ThreadRng is not Send, keep it out of the await
        let (jitter_ms, fails, price) = {
            let mut rng = rand::rng();
            (
                rng.random_range(0..=self.latency.as_millis() as u64 / 2),
                rng.random_bool(self.failure_rate),
                rng.random_range(1.0_f64..100.0),
            )
        };

        tokio::time::sleep(self.latency + Duration::from_millis(jitter_ms)).await;

        if fails {
            debug!("Simulated upstream failure for '{}'", item_code);
            return Err(LookupError::Unavailable(format!(
                "upstream timed out looking up '{}'",
                item_code
            )));
        }

        Ok((price * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_fails_at_zero_rate() {
        let service = SimulatedPriceService::new(Duration::ZERO, 0.0);
        for _ in 0..10 {
            let price = service.get_price_for("apple").await.unwrap();
            assert!((1.0..=100.0).contains(&price));
        }
        assert_eq!(service.calls(), 10);
    }

    #[tokio::test]
    async fn test_always_fails_at_full_rate() {
        let service = SimulatedPriceService::new(Duration::ZERO, 1.0);
        let err = service.get_price_for("apple").await.unwrap_err();
        assert!(matches!(err, LookupError::Unavailable(_)));
    }
}
