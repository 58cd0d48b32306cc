use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub max_age: Duration,
    pub upstream_latency: Duration,
    pub upstream_failure_rate: f64,
    pub items: Vec<String>,
}

impl Config {
    const DEFAULT_MAX_AGE_MS: u64 = 60_000;
    const DEFAULT_UPSTREAM_LATENCY_MS: u64 = 200;
    const DEFAULT_UPSTREAM_FAILURE_RATE: f64 = 0.1;
    const DEFAULT_ITEMS: &str = "apple,banana,cherry,durian";

    pub fn from_env() -> Self {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup, falling back to defaults
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_age_ms = parse_or_default(
            "PRICE_CACHE_MAX_AGE_MS",
            lookup("PRICE_CACHE_MAX_AGE_MS"),
            Self::DEFAULT_MAX_AGE_MS,
        );
        let latency_ms = parse_or_default(
            "PRICE_CACHE_UPSTREAM_LATENCY_MS",
            lookup("PRICE_CACHE_UPSTREAM_LATENCY_MS"),
            Self::DEFAULT_UPSTREAM_LATENCY_MS,
        );
        let failure_rate: f64 = parse_or_default(
            "PRICE_CACHE_UPSTREAM_FAILURE_RATE",
            lookup("PRICE_CACHE_UPSTREAM_FAILURE_RATE"),
            Self::DEFAULT_UPSTREAM_FAILURE_RATE,
        );
        let failure_rate = if failure_rate.is_nan() {
            warn!("PRICE_CACHE_UPSTREAM_FAILURE_RATE is NaN, using default");
            Self::DEFAULT_UPSTREAM_FAILURE_RATE
        } else {
            failure_rate.clamp(0.0, 1.0)
        };

        Self {
            max_age: Duration::from_millis(max_age_ms),
            upstream_latency: Duration::from_millis(latency_ms),
            upstream_failure_rate: failure_rate,
            items: lookup("PRICE_CACHE_ITEMS")
                .unwrap_or_else(|| Self::DEFAULT_ITEMS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match raw {
        None => default,
        Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default", name, value);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.max_age, Duration::from_secs(60));
        assert_eq!(config.upstream_latency, Duration::from_millis(200));
        assert_eq!(config.upstream_failure_rate, 0.1);
        assert_eq!(config.items, vec!["apple", "banana", "cherry", "durian"]);
    }

    #[test]
    fn test_reads_values() {
        let config = config_from(&[
            ("PRICE_CACHE_MAX_AGE_MS", "1500"),
            ("PRICE_CACHE_UPSTREAM_LATENCY_MS", "5"),
            ("PRICE_CACHE_UPSTREAM_FAILURE_RATE", "0.25"),
            ("PRICE_CACHE_ITEMS", " kiwi , ,mango"),
        ]);
        assert_eq!(config.max_age, Duration::from_millis(1500));
        assert_eq!(config.upstream_latency, Duration::from_millis(5));
        assert_eq!(config.upstream_failure_rate, 0.25);
        assert_eq!(config.items, vec!["kiwi", "mango"]);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PRICE_CACHE_MAX_AGE_MS", "soon"),
            ("PRICE_CACHE_UPSTREAM_FAILURE_RATE", "7"),
        ]);
        assert_eq!(config.max_age, Duration::from_secs(60));
        // out of range rates are clamped rather than rejected
        assert_eq!(config.upstream_failure_rate, 1.0);
    }
}
