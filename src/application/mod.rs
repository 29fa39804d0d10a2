//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters through
//! the ports to implement the forwarding pipeline.

pub mod dedup;
pub mod dispatch;
pub mod monitor;
pub mod snapshot;

pub use dedup::DedupStore;
pub use dispatch::{backoff_delay, Dispatcher};
pub use monitor::{Monitor, MonitorSettings, CONSECUTIVE_FAILURE_WARN_THRESHOLD};
pub use snapshot::fetch_snapshot;
