//! Lock-free process-lifetime counters.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::stats::{DedupStats, StatsSnapshot};

/// Number of consecutive failed scans at which an operational warning fires.
pub const CONSECUTIVE_FAILURE_WARN_THRESHOLD: u64 = 5;

#[derive(Default)]
pub(super) struct Counters {
    total_scans: AtomicU64,
    trades_processed: AtomicU64,
    webhooks_sent: AtomicU64,
    errors: AtomicU64,
    consecutive_failed_scans: AtomicU64,
    running: AtomicBool,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl Counters {
    pub(super) fn scan_started(&self) {
        self.total_scans.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the new consecutive failure count.
    pub(super) fn scan_failed(&self) -> u64 {
        self.errors.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failed_scans.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(super) fn snapshot_fetched(&self, failed_pages: u32) {
        self.consecutive_failed_scans.store(0, Ordering::Relaxed);
        self.errors
            .fetch_add(u64::from(failed_pages), Ordering::Relaxed);
    }

    pub(super) fn trade_dispatched(&self, delivered: bool) {
        self.trades_processed.fetch_add(1, Ordering::Relaxed);
        if delivered {
            self.webhooks_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn set_running(&self, running: bool) {
        if running {
            *self.started_at.lock() = Some(Utc::now());
        }
        self.running.store(running, Ordering::Release);
    }

    pub(super) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(super) fn snapshot(&self, cache: DedupStats) -> StatsSnapshot {
        let start_time = *self.started_at.lock();
        let uptime = start_time
            .map(|t| u64::try_from((Utc::now() - t).num_seconds()).unwrap_or(0))
            .unwrap_or(0);

        StatsSnapshot {
            total_scans: self.total_scans.load(Ordering::Relaxed),
            trades_processed: self.trades_processed.load(Ordering::Relaxed),
            webhooks_sent: self.webhooks_sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            consecutive_failed_scans: self.consecutive_failed_scans.load(Ordering::Relaxed),
            start_time,
            uptime,
            is_running: self.is_running(),
            cache,
        }
    }
}
