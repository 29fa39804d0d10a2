//! Webhook event envelope and delivery outcomes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::trade::{EventKind, Trade};

/// JSON envelope posted to the notification sink.
///
/// Serializes as `{event, timestamp, data: {trade}}`.
#[derive(Debug, Clone, Serialize)]
pub struct TradeEvent {
    pub event: EventKind,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub data: TradeEventData,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeEventData {
    pub trade: Trade,
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl TradeEvent {
    /// Build an envelope stamped with the current time.
    #[must_use]
    pub fn new(trade: &Trade, kind: EventKind) -> Self {
        Self::at(trade, kind, Utc::now())
    }

    #[must_use]
    pub fn at(trade: &Trade, kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: kind,
            timestamp,
            data: TradeEventData {
                trade: trade.clone(),
            },
        }
    }

    /// Serialized body bytes; the webhook signature is computed over these.
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Result of delivering one event, possibly over several attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    /// HTTP status of the last response, if any.
    pub status: Option<u16>,
    /// Error from the last failed attempt.
    pub error: Option<String>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

impl DeliveryOutcome {
    #[must_use]
    pub const fn delivered(status: u16, attempts: u32) -> Self {
        Self {
            success: true,
            status: Some(status),
            error: None,
            attempts,
        }
    }

    #[must_use]
    pub fn failed(status: Option<u16>, error: impl Into<String>, attempts: u32) -> Self {
        Self {
            success: false,
            status,
            error: Some(error.into()),
            attempts,
        }
    }
}
