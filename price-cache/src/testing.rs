// Upstream stubs shared by the unit tests of this crate

use crate::ports::PriceService;
use async_trait::async_trait;
use shared::LookupError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Outcome = Result<f64, LookupError>;

/// Replays a per-item script of outcomes; the last outcome repeats.
#[derive(Default)]
pub struct ScriptedPriceService {
    scripts: HashMap<String, Vec<Outcome>>,
    latencies: HashMap<String, Duration>,
    calls: AtomicUsize,
    calls_per_item: Mutex<HashMap<String, usize>>,
    returned: Mutex<Vec<(String, f64)>>,
}

impl ScriptedPriceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item_code: &str, outcomes: Vec<Outcome>) -> Self {
        self.scripts.insert(item_code.to_string(), outcomes);
        self
    }

    pub fn with_price(self, item_code: &str, price: f64) -> Self {
        self.with(item_code, vec![Ok(price)])
    }

    pub fn with_latency(mut self, item_code: &str, latency: Duration) -> Self {
        self.latencies.insert(item_code.to_string(), latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, item_code: &str) -> usize {
        self.calls_per_item
            .lock()
            .unwrap()
            .get(item_code)
            .copied()
            .unwrap_or(0)
    }

    /// Every price handed out for `item_code`, in call order
    pub fn returned_for(&self, item_code: &str) -> Vec<f64> {
        self.returned
            .lock()
            .unwrap()
            .iter()
            .filter(|(code, _)| code == item_code)
            .map(|(_, price)| *price)
            .collect()
    }
}

#[async_trait]
impl PriceService for ScriptedPriceService {
    async fn get_price_for(&self, item_code: &str) -> Result<f64, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let call = {
            let mut per_item = self.calls_per_item.lock().unwrap();
            let count = per_item.entry(item_code.to_string()).or_insert(0);
            *count += 1;
            *count - 1
        };

        if let Some(latency) = self.latencies.get(item_code) {
            tokio::time::sleep(*latency).await;
        }

        let script = self
            .scripts
            .get(item_code)
            .ok_or_else(|| LookupError::UnknownItem(item_code.to_string()))?;
        let outcome = script[call.min(script.len() - 1)].clone();
        if let Ok(price) = outcome {
            self.returned
                .lock()
                .unwrap()
                .push((item_code.to_string(), price));
        }
        outcome
    }
}
