//! Trade records as reported by the trade source.
//!
//! Trades are owned by the source; this crate only holds transient read-only
//! copies for the duration of one scan.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use super::id::TradeId;

/// Lifecycle status of a trade.
///
/// Only [`Open`](Self::Open), [`Processing`](Self::Processing) and
/// [`Pending`](Self::Pending) are forwarded downstream. Statuses this crate
/// does not know about are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TradeStatus {
    Open,
    Processing,
    Pending,
    Completed,
    Other(String),
}

impl TradeStatus {
    /// Whether trades in this status should be forwarded.
    #[must_use]
    pub const fn is_of_interest(&self) -> bool {
        matches!(self, Self::Open | Self::Processing | Self::Pending)
    }

    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "OPEN",
            Self::Processing => "PROCESSING",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TradeStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OPEN" => Self::Open,
            "PROCESSING" => Self::Processing,
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TradeStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TradeStatus> for String {
    fn from(status: TradeStatus) -> Self {
        match status {
            TradeStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of event sent to the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    TradeOpen,
    TradeProcessing,
    TradePending,
    TradeUnknown,
    /// Synthetic event used to verify a webhook endpoint.
    TradeTest,
}

impl EventKind {
    /// Map a trade status to the event kind announced downstream.
    #[must_use]
    pub const fn for_status(status: &TradeStatus) -> Self {
        match status {
            TradeStatus::Open => Self::TradeOpen,
            TradeStatus::Processing => Self::TradeProcessing,
            TradeStatus::Pending => Self::TradePending,
            TradeStatus::Completed | TradeStatus::Other(_) => Self::TradeUnknown,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TradeOpen => "TRADE_OPEN",
            Self::TradeProcessing => "TRADE_PROCESSING",
            Self::TradePending => "TRADE_PENDING",
            Self::TradeUnknown => "TRADE_UNKNOWN",
            Self::TradeTest => "TRADE_TEST",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade as returned by the trade source.
///
/// Everything except `id` and `status` is optional on the wire. Serializing a
/// trade yields exactly the field selection forwarded to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    pub status: TradeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub amount: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub open_price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub close_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_flag"
    )]
    pub is_demo: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_flag"
    )]
    pub from_bot: Option<bool>,
    /// Forwarded as received; the source mixes strings and numbers here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub pnl: Option<Decimal>,
}

/// Accepts `true`/`false`, `0`/`1` and their string forms. Anything else
/// reads as absent rather than failing the record.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => Some(b),
        Some(Raw::Int(n)) => Some(n != 0),
        Some(Raw::Float(n)) => Some(n != 0.0),
        Some(Raw::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        None => None,
    })
}

impl Trade {
    /// Create a trade with only the required fields set.
    pub fn new(id: impl Into<TradeId>, status: impl Into<TradeStatus>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            symbol: None,
            direction: None,
            amount: None,
            open_price: None,
            close_price: None,
            created_at: None,
            is_demo: None,
            from_bot: None,
            result: None,
            user_id: None,
            pnl: None,
        }
    }

    /// Whether this trade should be forwarded downstream.
    #[must_use]
    pub const fn is_of_interest(&self) -> bool {
        self.status.is_of_interest()
    }

    /// Event kind announced for this trade.
    #[must_use]
    pub const fn event_kind(&self) -> EventKind {
        EventKind::for_status(&self.status)
    }

    /// Content fingerprint used for dedup staleness checks.
    ///
    /// Hex SHA-256 over `(id, status, amount, openPrice, createdAt)`. A trade
    /// that moves to another status yields a different fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "id": self.id.as_str(),
            "status": self.status.as_str(),
            "amount": self.amount.map(|d| d.normalize().to_string()),
            "openPrice": self.open_price.map(|d| d.normalize().to_string()),
            "createdAt": self.created_at,
        });
        hex::encode(Sha256::digest(canonical.to_string().as_bytes()))
    }
}
