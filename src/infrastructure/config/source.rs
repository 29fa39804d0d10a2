//! Trade API configuration.

use serde::Deserialize;

/// `[source]` section.
///
/// The API token is never read from the file; it comes from `API_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Paginated trade endpoint, without query string.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Bound on concurrent page fetches (1..=20).
    pub max_concurrent_pages: usize,
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            page_size: 1000,
            timeout_ms: 10_000,
            max_concurrent_pages: 10,
            token: None,
        }
    }
}
