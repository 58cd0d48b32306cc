use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceEvent {
    Fetched(PriceFetchedEvent),
    Refreshed(PriceFetchedEvent),
    Evicted(PriceEvictedEvent),
    LookupFailed(LookupFailedEvent),
}

impl PriceEvent {
    pub fn item_code(&self) -> &str {
        match self {
            PriceEvent::Fetched(e) | PriceEvent::Refreshed(e) => &e.item_code,
            PriceEvent::Evicted(e) => &e.item_code,
            PriceEvent::LookupFailed(e) => &e.item_code,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PriceEvent::Fetched(_) => "fetched",
            PriceEvent::Refreshed(_) => "refreshed",
            PriceEvent::Evicted(_) => "evicted",
            PriceEvent::LookupFailed(_) => "lookup_failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFetchedEvent {
    pub item_code: String,
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEvictedEvent {
    pub item_code: String,
    /// Fetch time of the entry that expired
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupFailedEvent {
    pub item_code: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = PriceEvent::Refreshed(PriceFetchedEvent {
            item_code: "apple".to_string(),
            price: 20.0,
            fetched_at: Utc::now(),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "refreshed");
        assert_eq!(json["item_code"], "apple");
        assert_eq!(json["price"], 20.0);
        assert_eq!(event.kind(), "refreshed");
    }

    #[test]
    fn test_event_item_code() {
        let event = PriceEvent::LookupFailed(LookupFailedEvent {
            item_code: "durian".to_string(),
            reason: "service unavailable".to_string(),
        });
        assert_eq!(event.item_code(), "durian");

        let json = serde_json::to_string(&event).unwrap();
        let decoded: PriceEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(decoded, PriceEvent::LookupFailed(e) if e.reason == "service unavailable"));
    }
}
