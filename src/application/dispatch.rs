//! Event delivery with bounded retries.
//!
//! The dispatcher owns retry and backoff; the sink performs one attempt per
//! call. Delivery never touches the dedup store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::event::{DeliveryOutcome, TradeEvent};
use crate::domain::trade::{EventKind, Trade};
use crate::error::SinkError;
use crate::port::NotificationSink;

/// Default number of delivery attempts per trade.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between attempt `n` and attempt `n + 1` (1-based): `2^n` seconds.
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(32))
}

/// Delivers trade events to a [`NotificationSink`].
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn NotificationSink>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Whether the underlying sink can deliver at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_configured()
    }

    /// One delivery attempt.
    pub async fn deliver(&self, trade: &Trade, kind: EventKind) -> DeliveryOutcome {
        self.attempt(trade, kind, 1).await
    }

    /// Deliver with up to `max_attempts` attempts.
    ///
    /// Waits exactly [`backoff_delay(n)`](backoff_delay) after failed attempt
    /// `n`. Returns on the first success; after exhaustion the outcome carries
    /// the last error and `attempts == max_attempts`.
    pub async fn deliver_with_retry(
        &self,
        trade: &Trade,
        kind: EventKind,
        max_attempts: u32,
    ) -> DeliveryOutcome {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = self.attempt(trade, kind, attempt).await;
            if outcome.success || attempt >= max_attempts {
                if !outcome.success {
                    warn!(
                        trade_id = %trade.id,
                        attempts = attempt,
                        error = outcome.error.as_deref().unwrap_or("unknown"),
                        "Delivery failed, giving up until next scan"
                    );
                }
                return outcome;
            }

            let delay = backoff_delay(attempt);
            debug!(
                trade_id = %trade.id,
                attempt,
                delay_secs = delay.as_secs(),
                "Retrying delivery"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, trade: &Trade, kind: EventKind, attempt: u32) -> DeliveryOutcome {
        let event = TradeEvent::new(trade, kind);
        match self.sink.send(&event).await {
            Ok(receipt) => {
                info!(
                    trade_id = %trade.id,
                    event = %kind,
                    status = receipt.status,
                    attempt,
                    "Trade event delivered"
                );
                DeliveryOutcome::delivered(receipt.status, attempt)
            }
            Err(e) => {
                if !matches!(e, SinkError::NotConfigured) {
                    warn!(trade_id = %trade.id, attempt, error = %e, "Delivery attempt failed");
                }
                DeliveryOutcome::failed(e.status(), e.to_string(), attempt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::sink::RecordingSink;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn single_delivery_reports_status() {
        let sink = Arc::new(RecordingSink::accepting());
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher
            .deliver(&Trade::new("t1", "OPEN"), EventKind::TradeOpen)
            .await;

        assert_eq!(outcome, DeliveryOutcome::delivered(200, 1));
        assert_eq!(sink.events()[0].event, EventKind::TradeOpen);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_stops_on_first_success() {
        let sink = Arc::new(RecordingSink::scripted(vec![
            Err(SinkError::Rejected { status: 502 }),
            Ok(201),
        ]));
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher
            .deliver_with_retry(&Trade::new("t1", "PENDING"), EventKind::TradePending, 5)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.status, Some(201));
        assert_eq!(outcome.attempts, 2);
        assert_eq!(sink.gaps(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_report_last_error() {
        let sink = Arc::new(RecordingSink::rejecting(500));
        let dispatcher = Dispatcher::new(sink.clone());

        let outcome = dispatcher
            .deliver_with_retry(&Trade::new("t1", "OPEN"), EventKind::TradeOpen, 3)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.status, Some(500));
        assert_eq!(sink.attempts(), 3);
        assert_eq!(
            sink.gaps(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }
}
