//! Statistics domain types.
//!
//! Serializable views reported by the control surface and logged on stop.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dedup store occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupStats {
    /// Records currently held, expired or not.
    pub count: usize,
    pub active: usize,
    pub expired: usize,
    /// Expiry window in seconds, `None` when records never expire.
    pub ttl_secs: Option<u64>,
    pub max_entries: usize,
    /// Persistence backend name.
    pub backend: &'static str,
}

/// Process-lifetime counters of the monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_scans: u64,
    pub trades_processed: u64,
    pub webhooks_sent: u64,
    pub errors: u64,
    pub consecutive_failed_scans: u64,
    pub start_time: Option<DateTime<Utc>>,
    /// Seconds since the monitor last started.
    pub uptime: u64,
    pub is_running: bool,
    pub cache: DedupStats,
}

impl StatsSnapshot {
    /// Uptime rendered as `XmYs` for log summaries.
    #[must_use]
    pub fn uptime_display(&self) -> String {
        format!("{}m {}s", self.uptime / 60, self.uptime % 60)
    }
}
