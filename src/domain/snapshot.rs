//! Point-in-time views of the trade source and per-scan results.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::trade::Trade;

/// Union of every trade returned across all pages of one fetch cycle.
///
/// A snapshot is built once per scan and never merged with another.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Trades in page order, then item order within a page.
    pub trades: Vec<Trade>,
    /// Page count reported by the source on page 1.
    pub total_pages: u32,
    /// Record count reported by the source on page 1.
    pub total_count: u64,
    /// Number of pages whose fetch failed.
    pub failed_pages: u32,
    /// When the fetch started.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Whether any page was missing from this snapshot.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.failed_pages > 0
    }

    /// Distinct statuses present, in first-seen order.
    #[must_use]
    pub fn statuses(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for trade in &self.trades {
            let status = trade.status.as_str();
            if !seen.contains(&status) {
                seen.push(status);
            }
        }
        seen
    }
}

/// What one scan fetched and filtered.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub trades: Vec<Trade>,
    pub of_interest: Vec<Trade>,
    pub failed_pages: u32,
    pub duration: Duration,
}

impl ScanResult {
    /// Filter a snapshot down to the trades worth forwarding.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot, duration: Duration) -> Self {
        let of_interest = snapshot
            .trades
            .iter()
            .filter(|t| t.is_of_interest())
            .cloned()
            .collect();
        Self {
            trades: snapshot.trades,
            of_interest,
            failed_pages: snapshot.failed_pages,
            duration,
        }
    }
}

/// Dispatch outcome counts for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub fetched: usize,
    pub of_interest: usize,
    pub skipped: usize,
    pub delivered: usize,
    pub failed: usize,
    pub failed_pages: u32,
}

impl ScanReport {
    /// Trades handed to the dispatcher during this scan.
    #[must_use]
    pub const fn dispatched(&self) -> usize {
        self.delivered + self.failed
    }
}
