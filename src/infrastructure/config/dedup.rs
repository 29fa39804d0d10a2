//! Dedup store configuration.

use std::time::Duration;

use serde::Deserialize;

/// Durable backend behind the dedup store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupBackend {
    /// Nothing survives a restart.
    #[default]
    Memory,
    /// One JSON document, replaced atomically.
    File,
    /// SQLite database via Diesel.
    Sqlite,
}

/// `[dedup]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub backend: DedupBackend,
    /// File or database path for durable backends.
    pub path: String,
    /// Record lifetime in seconds. `0` keeps records until evicted.
    pub ttl_secs: u64,
    pub max_entries: usize,
    /// Seconds between background flushes of a durable backend.
    pub flush_interval_secs: u64,
}

impl DedupConfig {
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            backend: DedupBackend::Memory,
            path: "data/delivered.json".into(),
            ttl_secs: 86_400,
            max_entries: 100_000,
            flush_interval_secs: 60,
        }
    }
}
