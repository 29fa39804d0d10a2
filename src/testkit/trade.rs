//! Builders for trades used across tests.

use rust_decimal::Decimal;

use crate::domain::trade::Trade;

/// A trade with realistic optional fields filled in.
pub fn trade(id: &str, status: &str) -> Trade {
    let mut trade = Trade::new(id, status);
    trade.symbol = Some("EURUSD".into());
    trade.direction = Some("BUY".into());
    trade.amount = Some(Decimal::new(10_000, 2));
    trade.open_price = Some(Decimal::new(108_450, 5));
    trade.created_at = Some("2026-10-19T12:00:00.000Z".into());
    trade.is_demo = Some(true);
    trade
}

/// `n` OPEN trades with ids `{prefix}0`..`{prefix}{n-1}`.
pub fn open_trades(prefix: &str, n: usize) -> Vec<Trade> {
    (0..n).map(|i| trade(&format!("{prefix}{i}"), "OPEN")).collect()
}

/// One trade per status, ids `s0`, `s1`, ...
pub fn trades_with_statuses(statuses: &[&str]) -> Vec<Trade> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| trade(&format!("s{i}"), status))
        .collect()
}
