mod upstream;

use price_cache::{CacheAdmin, CacheConfig, PriceEvent, PriceOperations, TransparentCache};
use shared::config::Config;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use upstream::SimulatedPriceService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting price cache demo");

    // Load environment variables
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    info!(
        "max_age={:?} upstream_latency={:?} failure_rate={} items={:?}",
        config.max_age, config.upstream_latency, config.upstream_failure_rate, config.items
    );

    let service = Arc::new(SimulatedPriceService::new(
        config.upstream_latency,
        config.upstream_failure_rate,
    ));

    let (events_tx, mut events_rx) = broadcast::channel::<PriceEvent>(256);
    let cache = TransparentCache::new(service.clone(), CacheConfig::from(&config))?
        .with_event_broadcaster(events_tx);

    let event_logger = tokio::spawn(async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => info!("event {}", json),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event logger lagged, skipped {} event(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let items: Vec<&str> = config.items.iter().map(String::as_str).collect();

    // Cold batch, then the same batch again from cache
    run_batch(&cache, &items, "cold").await;
    run_batch(&cache, &items, "warm").await;

    // Several concurrent misses on one key all go upstream
    if let Some(first) = items.first() {
        cache.invalidate(first);
        let lookups = (0..4).map(|_| cache.get_price_for(first));
        let results = futures::future::join_all(lookups).await;
        info!(
            "{} concurrent lookups for '{}' after invalidation: {:?}",
            results.len(),
            first,
            results.iter().map(|r| r.as_ref().ok()).collect::<Vec<_>>()
        );
    }

    info!("Waiting {:?} for entries to expire", config.max_age);
    tokio::time::sleep(config.max_age).await;
    run_batch(&cache, &items, "expired").await;

    let info = cache.describe();
    info!(
        "entries={} hits={} misses={} evictions={} upstream_failures={} upstream_calls={}",
        info.entries,
        info.hits,
        info.misses,
        info.evictions,
        info.upstream_failures,
        service.calls()
    );

    // Dropping the cache closes the event channel
    drop(cache);
    if let Err(e) = event_logger.await {
        error!("Event logger task failed: {}", e);
    }

    info!("Price cache demo finished");
    Ok(())
}

async fn run_batch(cache: &TransparentCache, items: &[&str], label: &str) {
    let started = std::time::Instant::now();
    match cache.get_prices_for(items).await {
        Ok(prices) => info!(
            "[{}] resolved {} price(s) in {:?}: {:?}",
            label,
            prices.len(),
            started.elapsed(),
            prices
        ),
        Err(e) => {
            warn!("[{}] batch failed after {:?}: {}", label, started.elapsed(), e);
            if let Some(partial) = e.partial_results() {
                info!("[{}] partial results (incomplete): {:?}", label, partial);
            }
        }
    }
}
