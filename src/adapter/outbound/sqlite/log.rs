//! SQLite delivered-trade log.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::database::connection::{create_pool, run_migrations, DbPool};
use super::database::model::DeliveredTradeRow;
use super::database::schema::delivered_trades;
use crate::domain::delivered::DeliveredRecord;
use crate::domain::id::TradeId;
use crate::error::{Error, Result};
use crate::port::DeliveredLog;

/// SQLite-backed [`DeliveredLog`].
///
/// Each persist replaces the table contents inside one transaction.
pub struct SqliteDeliveredLog {
    pool: DbPool,
}

impl SqliteDeliveredLog {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &str) -> Result<Self> {
        let pool = create_pool(path)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn to_row(record: &DeliveredRecord) -> DeliveredTradeRow {
        DeliveredTradeRow {
            id: record.id.to_string(),
            fingerprint: record.fingerprint.clone(),
            // Fixed width so text order is chronological order.
            delivered_at: record.delivered_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    fn from_row(row: DeliveredTradeRow) -> Result<DeliveredRecord> {
        let delivered_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.delivered_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(DeliveredRecord::new(
            TradeId::from(row.id),
            delivered_at,
            row.fingerprint,
        ))
    }
}

impl DeliveredLog for SqliteDeliveredLog {
    fn load(&self) -> Result<Vec<DeliveredRecord>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<DeliveredTradeRow> = delivered_trades::table
            .select(DeliveredTradeRow::as_select())
            .order(delivered_trades::delivered_at.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }

    fn persist(&self, records: &[DeliveredRecord]) -> Result<()> {
        let rows: Vec<DeliveredTradeRow> = records.iter().map(Self::to_row).collect();
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(delivered_trades::table).execute(conn)?;
            // SQLite caps bound parameters per statement; three per row.
            for chunk in rows.chunks(256) {
                diesel::insert_into(delivered_trades::table)
                    .values(chunk)
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_log() -> (tempfile::TempDir, SqliteDeliveredLog) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delivered.db");
        let log = SqliteDeliveredLog::open(&path.to_string_lossy()).unwrap();
        (dir, log)
    }

    #[test]
    fn empty_database_loads_nothing() {
        let (_dir, log) = temp_log();
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn persist_replaces_previous_state() {
        let (_dir, log) = temp_log();
        let now = Utc::now();

        log.persist(&[
            DeliveredRecord::new(TradeId::new("a"), now, Some("fp-a".into())),
            DeliveredRecord::new(TradeId::new("b"), now, None),
        ])
        .unwrap();
        log.persist(&[DeliveredRecord::new(
            TradeId::new("c"),
            now + Duration::seconds(1),
            None,
        )])
        .unwrap();

        let loaded = log.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id.as_str(), "c");
    }

    #[test]
    fn records_keep_fingerprint_and_order() {
        let (_dir, log) = temp_log();
        let now = Utc::now();

        log.persist(&[
            DeliveredRecord::new(TradeId::new("late"), now, None),
            DeliveredRecord::new(TradeId::new("early"), now - Duration::minutes(5), Some("fp".into())),
        ])
        .unwrap();

        let loaded = log.load().unwrap();
        assert_eq!(loaded[0].id.as_str(), "early");
        assert_eq!(loaded[0].fingerprint.as_deref(), Some("fp"));
        assert_eq!(loaded[1].fingerprint, None);
    }

    #[test]
    fn persist_handles_more_rows_than_one_statement() {
        let (_dir, log) = temp_log();
        let now = Utc::now();
        let records: Vec<_> = (0..1000)
            .map(|i| DeliveredRecord::new(TradeId::new(format!("t{i}")), now, None))
            .collect();

        log.persist(&records).unwrap();

        assert_eq!(log.load().unwrap().len(), 1000);
    }
}
