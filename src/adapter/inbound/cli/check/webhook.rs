//! `tradewatch check webhook`.

use std::path::Path;

use rust_decimal::Decimal;

use crate::domain::event::TradeEvent;
use crate::domain::trade::{EventKind, Trade};
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap::build_webhook;
use crate::infrastructure::config::settings::Config;
use crate::port::NotificationSink;

/// Synthetic trade carried by the test event.
pub fn test_trade() -> Trade {
    let mut trade = Trade::new("test-trade", "OPEN");
    trade.symbol = Some("TEST".into());
    trade.direction = Some("BUY".into());
    trade.amount = Some(Decimal::ONE_HUNDRED);
    trade.open_price = Some(Decimal::ONE);
    trade.created_at = Some(chrono::Utc::now().to_rfc3339());
    trade.is_demo = Some(true);
    trade
}

/// Deliver one `TRADE_TEST` event to the configured webhook.
///
/// Makes a single attempt so the operator sees the raw outcome.
///
/// # Errors
/// Returns an error if no webhook is configured or the delivery fails.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let Some(sink) = build_webhook(&config)? else {
        return Err(ConfigError::MissingField {
            field: "webhook.url (or WEBHOOK_URL)",
        }
        .into());
    };

    println!("Sending TRADE_TEST event to {}", sink.url());
    let event = TradeEvent::new(&test_trade(), EventKind::TradeTest);
    let receipt = sink.send(&event).await?;

    println!("✓ Webhook accepted test event (HTTP {})", receipt.status);
    if config.webhook.secret.is_some() {
        println!("  Payload was signed with WEBHOOK_SECRET");
    }
    Ok(())
}
