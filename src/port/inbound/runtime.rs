//! Runtime control port for operator-facing adapters.
//!
//! Keeps control surfaces (the HTTP control server) decoupled from the
//! concrete monitor implementation.

use async_trait::async_trait;

use crate::domain::stats::StatsSnapshot;

/// Operator actions accepted by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Restart,
}

impl ControlAction {
    /// Parse an action name as it appears in a control URL.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            _ => None,
        }
    }

    /// Message acknowledging the action.
    #[must_use]
    pub const fn acknowledgement(self) -> &'static str {
        match self {
            Self::Start => "monitor started",
            Self::Stop => "monitor stopped",
            Self::Restart => "monitor restarted",
        }
    }
}

/// Lifecycle control and statistics for the scan monitor.
#[async_trait]
pub trait MonitorControl: Send + Sync {
    /// Transition to running. No-op when already running.
    async fn start(&self);

    /// Transition to stopped. No-op when already stopped.
    async fn stop(&self);

    /// Stop then start.
    async fn restart(&self) {
        self.stop().await;
        self.start().await;
    }

    /// Current counters.
    fn stats(&self) -> StatsSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_actions() {
        assert_eq!(ControlAction::parse("start"), Some(ControlAction::Start));
        assert_eq!(ControlAction::parse("stop"), Some(ControlAction::Stop));
        assert_eq!(ControlAction::parse("restart"), Some(ControlAction::Restart));
        assert_eq!(ControlAction::parse("pause"), None);
    }
}
