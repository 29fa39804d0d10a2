//! `tradewatch check source`.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::bootstrap::build_source;
use crate::infrastructure::config::settings::Config;
use crate::port::TradeSource;

/// Fetch page 1 from the trade API and report what came back.
///
/// # Errors
/// Returns an error if configuration is invalid or the fetch fails.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let source = build_source(&config)?;

    println!("Fetching page 1 from {}", config.source.base_url);
    let page = source.fetch_page(1).await?;

    let of_interest = page.trades.iter().filter(|t| t.is_of_interest()).count();
    println!("✓ Trade API reachable");
    println!();
    println!("  Pages: {}", page.total_pages);
    println!("  Records: {}", page.total_count);
    println!("  Trades on page 1: {}", page.trades.len());
    println!("  Of interest on page 1: {of_interest}");
    Ok(())
}
