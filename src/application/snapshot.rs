//! Multi-page snapshot assembly on top of a [`TradeSource`].

use std::time::Instant;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::domain::snapshot::Snapshot;
use crate::error::SourceError;
use crate::port::TradeSource;

/// Default bound on in-flight page requests.
pub const DEFAULT_MAX_CONCURRENT_PAGES: usize = 10;

/// Fetch every page the source reports into one [`Snapshot`].
///
/// Page 1 is fetched first to learn the page count; its failure fails the
/// whole snapshot. The remaining pages are fetched with at most
/// `max_concurrent` requests in flight. A failing later page is logged and
/// counted in [`Snapshot::failed_pages`] without aborting the others.
///
/// Trades keep page order, then item order within a page.
///
/// # Errors
///
/// Returns the page-1 error when the first page cannot be fetched.
pub async fn fetch_snapshot(
    source: &dyn TradeSource,
    max_concurrent: usize,
) -> Result<Snapshot, SourceError> {
    let fetched_at = Utc::now();
    let started = Instant::now();

    let first = source.fetch_page(1).await?;
    let total_pages = first.total_pages.max(1);
    let total_count = first.total_count;
    let mut trades = first.trades;

    let mut failed_pages = 0u32;
    if total_pages > 1 {
        // `buffered` keeps completion order equal to page order.
        let results: Vec<_> = stream::iter(2..=total_pages)
            .map(|page| source.fetch_page(page))
            .buffered(max_concurrent.max(1))
            .collect()
            .await;

        for result in results {
            match result {
                Ok(page) => trades.extend(page.trades),
                Err(e) => {
                    failed_pages += 1;
                    warn!(page = e.page(), error = %e, "Page fetch failed");
                }
            }
        }
    }

    debug!(
        pages = total_pages,
        failed_pages,
        trades = trades.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Snapshot fetched"
    );

    Ok(Snapshot {
        trades,
        total_pages,
        total_count,
        failed_pages,
        fetched_at,
    })
}
