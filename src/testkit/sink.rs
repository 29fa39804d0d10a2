//! Recording [`NotificationSink`] for delivery assertions.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::event::TradeEvent;
use crate::error::SinkError;
use crate::port::{NotificationSink, SinkReceipt};

/// Sink that records every attempt and answers from a script.
///
/// Attempt times use tokio's clock, so tests running with paused time can
/// assert exact backoff gaps.
pub struct RecordingSink {
    script: Mutex<VecDeque<Result<u16, SinkError>>>,
    fallback: Result<u16, SinkError>,
    attempts: Mutex<Vec<(Instant, TradeEvent)>>,
}

impl RecordingSink {
    /// Answers every attempt with `200`.
    pub fn accepting() -> Self {
        Self::scripted(Vec::new())
    }

    /// Answers every attempt with `status`.
    pub fn rejecting(status: u16) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(SinkError::Rejected { status }),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Answers from `script` in order, then with `200`.
    pub fn scripted(script: Vec<Result<u16, SinkError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Ok(200),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Every event received, in order.
    pub fn events(&self) -> Vec<TradeEvent> {
        self.attempts.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Trade ids of every attempt, in order.
    pub fn trade_ids(&self) -> Vec<String> {
        self.attempts
            .lock()
            .iter()
            .map(|(_, e)| e.data.trade.id.to_string())
            .collect()
    }

    /// Time between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let attempts = self.attempts.lock();
        attempts
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, event: &TradeEvent) -> Result<SinkReceipt, SinkError> {
        self.attempts.lock().push((Instant::now(), event.clone()));
        let response = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        response.map(|status| SinkReceipt { status })
    }
}
