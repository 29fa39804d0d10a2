//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::delivered_trades;

/// Database row for a delivered trade.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = delivered_trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DeliveredTradeRow {
    pub id: String,
    pub fingerprint: Option<String>,
    /// RFC 3339 timestamp.
    pub delivered_at: String,
}
