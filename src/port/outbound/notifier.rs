//! Notification sink port.
//!
//! The sink is the downstream endpoint receiving one POST per trade event.

use async_trait::async_trait;

use crate::domain::event::TradeEvent;
use crate::error::SinkError;

/// Successful acknowledgement from the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReceipt {
    /// HTTP status returned by the sink (always 2xx).
    pub status: u16,
}

/// Single-attempt delivery of an event.
///
/// Implementations perform exactly one delivery attempt per call. Retry and
/// backoff live in the dispatcher, not here.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Any non-2xx response is a [`SinkError::Rejected`]
/// - Timeouts and connection failures are [`SinkError::Transport`]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Attempt to deliver one event.
    async fn send(&self, event: &TradeEvent) -> Result<SinkReceipt, SinkError>;

    /// Whether the sink has a destination configured.
    ///
    /// A sink without one never delivers; callers skip dispatch entirely.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Sink used when no webhook URL is configured.
pub struct DisabledSink;

#[async_trait]
impl NotificationSink for DisabledSink {
    async fn send(&self, _event: &TradeEvent) -> Result<SinkReceipt, SinkError> {
        Err(SinkError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{EventKind, Trade};

    #[tokio::test]
    async fn disabled_sink_never_delivers() {
        let sink = DisabledSink;
        let event = TradeEvent::new(&Trade::new("t1", "OPEN"), EventKind::TradeOpen);

        assert!(!sink.is_configured());
        assert_eq!(sink.send(&event).await, Err(SinkError::NotConfigured));
    }
}
