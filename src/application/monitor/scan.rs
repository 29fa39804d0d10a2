//! One fetch, filter and dispatch pass.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::counters::CONSECUTIVE_FAILURE_WARN_THRESHOLD;
use super::Monitor;
use crate::application::snapshot::fetch_snapshot;
use crate::domain::snapshot::{ScanReport, ScanResult};
use crate::error::SourceError;

impl Monitor {
    /// Run one scan cycle.
    ///
    /// Scans are serialized: a call made while another scan is in flight waits
    /// for it. Only a page-1 failure fails the scan; it is counted and the
    /// monitor keeps running.
    ///
    /// # Errors
    ///
    /// Returns the source error when the snapshot could not be fetched.
    pub async fn scan(&self) -> Result<ScanReport, SourceError> {
        let _guard = self.inner.scan_lock.lock().await;
        let inner = &self.inner;
        let started = Instant::now();
        inner.counters.scan_started();

        inner.dedup.purge_expired();

        let snapshot = match fetch_snapshot(
            inner.source.as_ref(),
            inner.settings.max_concurrent_pages,
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let consecutive = inner.counters.scan_failed();
                error!(consecutive, error = %e, "Scan failed");
                if consecutive >= CONSECUTIVE_FAILURE_WARN_THRESHOLD {
                    warn!(
                        consecutive,
                        "Many consecutive scan failures, check trade source connectivity"
                    );
                }
                return Err(e);
            }
        };

        inner.counters.snapshot_fetched(snapshot.failed_pages);
        let total_pages = snapshot.total_pages;
        debug!(statuses = ?snapshot.statuses(), "Statuses in snapshot");

        let result = ScanResult::from_snapshot(snapshot, started.elapsed());
        let mut report = ScanReport {
            fetched: result.trades.len(),
            of_interest: result.of_interest.len(),
            failed_pages: result.failed_pages,
            ..ScanReport::default()
        };

        info!(
            trades = report.fetched,
            of_interest = report.of_interest,
            pages = total_pages,
            failed_pages = report.failed_pages,
            "Scan fetched snapshot"
        );

        if report.of_interest > 0 && !inner.dispatcher.is_enabled() {
            warn!(
                of_interest = report.of_interest,
                "Webhook URL not configured, skipping dispatch"
            );
            return Ok(report);
        }

        for trade in &result.of_interest {
            let fingerprint = trade.fingerprint();
            if inner.dedup.is_delivered(&trade.id, Some(&fingerprint)) {
                debug!(trade_id = %trade.id, "Already delivered, skipping");
                report.skipped += 1;
                continue;
            }

            info!(
                trade_id = %trade.id,
                status = %trade.status,
                symbol = trade.symbol.as_deref().unwrap_or("-"),
                "New trade of interest"
            );

            let outcome = inner
                .dispatcher
                .deliver_with_retry(trade, trade.event_kind(), inner.settings.max_attempts)
                .await;

            if outcome.success {
                inner.dedup.mark_delivered(trade);
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
            inner.counters.trade_dispatched(outcome.success);
        }

        debug!(
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(report)
    }
}
