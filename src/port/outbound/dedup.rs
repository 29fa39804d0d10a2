//! Delivered-trade persistence port.
//!
//! Backs the in-memory dedup store with optional durable storage so that a
//! restart does not redeliver everything. Persistence is best-effort: a lost
//! write only risks redundant delivery, since trade content can always be
//! fetched again from the source.

use crate::domain::delivered::DeliveredRecord;
use crate::error::Result;

/// Durable log of delivered trades.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the dedup store may be flushed from
/// the scan loop while the control surface reads stats.
pub trait DeliveredLog: Send + Sync {
    /// Load every persisted record. Expiry is applied by the caller.
    fn load(&self) -> Result<Vec<DeliveredRecord>>;

    /// Replace the persisted state with `records`.
    ///
    /// Must be atomic: after a crash the log holds either the previous or the
    /// new state, never a mix.
    fn persist(&self, records: &[DeliveredRecord]) -> Result<()>;

    /// Backend name for logging and stats.
    fn backend_name(&self) -> &'static str;
}
