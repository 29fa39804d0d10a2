//! Source-agnostic domain types.

pub mod delivered;
pub mod event;
pub mod id;
pub mod snapshot;
pub mod stats;
pub mod trade;

pub use delivered::DeliveredRecord;
pub use event::{DeliveryOutcome, TradeEvent, TradeEventData};
pub use id::TradeId;
pub use snapshot::{ScanReport, ScanResult, Snapshot};
pub use stats::{DedupStats, StatsSnapshot};
pub use trade::{EventKind, Trade, TradeStatus};
