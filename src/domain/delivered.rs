//! Records of confirmed deliveries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::TradeId;

/// Proof that a trade was delivered downstream.
///
/// Created only after the sink acknowledged the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredRecord {
    pub id: TradeId,
    pub delivered_at: DateTime<Utc>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl DeliveredRecord {
    pub fn new(id: TradeId, delivered_at: DateTime<Utc>, fingerprint: Option<String>) -> Self {
        Self {
            id,
            delivered_at,
            fingerprint,
        }
    }

    /// Whether the record is older than `ttl` at `now`.
    #[must_use]
    pub fn is_expired(&self, ttl: Option<chrono::Duration>, now: DateTime<Utc>) -> bool {
        ttl.is_some_and(|ttl| now - self.delivered_at >= ttl)
    }

    /// Whether a fingerprint observed now still matches this record.
    ///
    /// Records without a stored fingerprint match anything.
    #[must_use]
    pub fn matches(&self, fingerprint: Option<&str>) -> bool {
        match (self.fingerprint.as_deref(), fingerprint) {
            (Some(stored), Some(current)) => stored == current,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_honours_ttl() {
        let now = Utc::now();
        let record = DeliveredRecord::new(
            TradeId::new("t1"),
            now - chrono::Duration::seconds(61),
            None,
        );

        assert!(record.is_expired(Some(chrono::Duration::seconds(60)), now));
        assert!(!record.is_expired(Some(chrono::Duration::seconds(120)), now));
        assert!(!record.is_expired(None, now));
    }

    #[test]
    fn fingerprint_match_rules() {
        let record = DeliveredRecord::new(TradeId::new("t1"), Utc::now(), Some("abc".into()));
        assert!(record.matches(Some("abc")));
        assert!(!record.matches(Some("def")));
        assert!(record.matches(None));

        let legacy = DeliveredRecord::new(TradeId::new("t2"), Utc::now(), None);
        assert!(legacy.matches(Some("anything")));
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = DeliveredRecord::new(TradeId::new("t1"), Utc::now(), Some("f".into()));
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("deliveredAt").is_some());
        assert_eq!(value["id"], "t1");
    }
}
