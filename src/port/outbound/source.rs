//! Trade source port.
//!
//! The trade source is the paginated read API this crate polls. It is the
//! authoritative owner of every [`Trade`].

use async_trait::async_trait;

use crate::domain::trade::Trade;
use crate::error::SourceError;

/// One page of trades.
#[derive(Debug, Clone, Default)]
pub struct TradePage {
    pub trades: Vec<Trade>,
    /// Total number of pages (`lastPage` on the wire).
    pub total_pages: u32,
    /// Total number of records (`count` on the wire).
    pub total_count: u64,
    /// Page number echoed by the source, when present.
    pub current_page: Option<u32>,
}

/// Paginated read access to the trade source.
///
/// Pages are 1-based. Implementations must report transport problems as
/// [`SourceError::Unavailable`] and malformed responses (missing trade array
/// or page count) as [`SourceError::Protocol`].
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetch a single page.
    async fn fetch_page(&self, page: u32) -> Result<TradePage, SourceError>;
}
