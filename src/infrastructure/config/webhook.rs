//! Webhook sink configuration.

use serde::Deserialize;

/// `[webhook]` section.
///
/// Without a URL the monitor still scans but delivers nothing. The signing
/// secret comes from `WEBHOOK_SECRET` only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: Option<String>,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Delivery attempts per trade per scan (1..=10).
    pub max_attempts: u32,
    #[serde(skip)]
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 5_000,
            max_attempts: 3,
            secret: None,
        }
    }
}
