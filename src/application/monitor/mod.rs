//! Scan cycle controller.
//!
//! Owns the periodic scan loop, the Stopped/Running lifecycle and the
//! process-lifetime counters. Cheap to clone; clones share state.

mod counters;
mod scan;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

pub use counters::CONSECUTIVE_FAILURE_WARN_THRESHOLD;

use self::counters::Counters;
use super::dedup::DedupStore;
use super::dispatch::{Dispatcher, DEFAULT_MAX_ATTEMPTS};
use super::snapshot::DEFAULT_MAX_CONCURRENT_PAGES;
use crate::domain::stats::StatsSnapshot;
use crate::port::{MonitorControl, TradeSource};

/// Scheduling and delivery parameters of the monitor.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Time between scan starts.
    pub interval: Duration,
    /// Delivery attempts per trade per scan.
    pub max_attempts: u32,
    /// Bound on concurrent page fetches.
    pub max_concurrent_pages: usize,
    /// How often the dedup store is flushed while running.
    pub flush_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_concurrent_pages: DEFAULT_MAX_CONCURRENT_PAGES,
            flush_interval: Duration::from_secs(60),
        }
    }
}

struct RunningLoop {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

struct Inner {
    source: Arc<dyn TradeSource>,
    dispatcher: Dispatcher,
    dedup: Arc<DedupStore>,
    settings: MonitorSettings,
    counters: Counters,
    /// Serializes scans so dedup reads never race dedup writes.
    scan_lock: Mutex<()>,
    /// `Some` while running. Held across transitions.
    lifecycle: Mutex<Option<RunningLoop>>,
}

/// Periodic trade monitor.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Inner>,
}

impl Monitor {
    pub fn new(
        source: Arc<dyn TradeSource>,
        dispatcher: Dispatcher,
        dedup: Arc<DedupStore>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                dispatcher,
                dedup,
                settings,
                counters: Counters::default(),
                scan_lock: Mutex::new(()),
                lifecycle: Mutex::new(None),
            }),
        }
    }

    /// Whether the periodic loop is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.counters.is_running()
    }

    /// The dedup store shared with this monitor.
    #[must_use]
    pub fn dedup(&self) -> &Arc<DedupStore> {
        &self.inner.dedup
    }

    /// Start monitoring.
    ///
    /// Runs one scan immediately and waits for it, then schedules further
    /// scans every `interval`. No-op when already running.
    pub async fn start(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        self.start_locked(&mut lifecycle).await;
    }

    /// Stop monitoring.
    ///
    /// Lets an in-flight scan finish, flushes the dedup store and logs the
    /// final statistics. No-op when already stopped.
    ///
    /// Also completes a start whose first scan was cancelled part-way: the
    /// loop never got installed, but deliveries made so far are flushed.
    pub async fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        self.stop_locked(&mut lifecycle).await;
    }

    /// Stop then start under one hold of the lifecycle lock, so no other
    /// transition can land in between.
    pub async fn restart(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        self.stop_locked(&mut lifecycle).await;
        self.start_locked(&mut lifecycle).await;
    }

    async fn start_locked(&self, lifecycle: &mut Option<RunningLoop>) {
        if lifecycle.is_some() {
            info!("Monitor already running");
            return;
        }

        info!(
            interval_ms = self.inner.settings.interval.as_millis() as u64,
            max_attempts = self.inner.settings.max_attempts,
            "Starting trade monitor"
        );
        self.inner.counters.set_running(true);

        // Failure is already counted and logged inside the scan.
        let _ = self.scan().await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.clone().run_loop(shutdown_rx));
        *lifecycle = Some(RunningLoop {
            shutdown: shutdown_tx,
            handle,
        });
    }

    async fn stop_locked(&self, lifecycle: &mut Option<RunningLoop>) {
        match lifecycle.take() {
            Some(running) => {
                info!("Stopping trade monitor");
                self.inner.counters.set_running(false);
                let _ = running.shutdown.send(true);
                if let Err(e) = running.handle.await {
                    error!(error = %e, "Scan loop task ended abnormally");
                }
            }
            None if self.inner.counters.is_running() => {
                warn!("Stopping trade monitor interrupted during its first scan");
                self.inner.counters.set_running(false);
            }
            None => {
                info!("Monitor already stopped");
                return;
            }
        }

        self.flush_dedup().await;
        self.log_summary();
    }

    /// Current counters and dedup occupancy.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.counters.snapshot(self.inner.dedup.stats())
    }

    async fn run_loop(self, mut shutdown: watch::Receiver<bool>) {
        let period = self.inner.settings.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let flush_period = self.inner.settings.flush_interval;
        let mut flush_ticker = interval_at(Instant::now() + flush_period, flush_period);
        flush_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let persistent = self.inner.dedup.is_persistent();

        loop {
            // Work runs in the branch body, so shutdown never cancels a scan
            // half-way through.
            tokio::select! {
                biased;
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let _ = self.scan().await;
                }
                _ = flush_ticker.tick(), if persistent => {
                    self.flush_dedup().await;
                }
            }
        }
    }

    async fn flush_dedup(&self) {
        let dedup = Arc::clone(&self.inner.dedup);
        match tokio::task::spawn_blocking(move || dedup.flush()).await {
            Ok(Ok(_)) => {}
            // Already logged by the store; the next flush retries.
            Ok(Err(_)) => {}
            Err(e) => warn!(error = %e, "Dedup flush task failed"),
        }
    }

    fn log_summary(&self) {
        let stats = self.stats();
        info!(
            total_scans = stats.total_scans,
            trades_processed = stats.trades_processed,
            webhooks_sent = stats.webhooks_sent,
            errors = stats.errors,
            uptime = %stats.uptime_display(),
            cached = stats.cache.count,
            "Monitor statistics"
        );
    }
}

#[async_trait]
impl MonitorControl for Monitor {
    async fn start(&self) {
        Monitor::start(self).await;
    }

    async fn stop(&self) {
        Monitor::stop(self).await;
    }

    async fn restart(&self) {
        Monitor::restart(self).await;
    }

    fn stats(&self) -> StatsSnapshot {
        Monitor::stats(self)
    }
}
