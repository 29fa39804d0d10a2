//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Trade  │            │  Delivered  │              │  Webhook  │
//! │ Source  │            │     Log     │              │   Sink    │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`TradeSource`] - Paginated trade reads
//! - [`NotificationSink`] - Single-attempt event delivery
//! - [`DeliveredLog`] - Durable storage behind the dedup store
//! - [`MonitorControl`] - Lifecycle control for operator surfaces

pub mod inbound;
pub mod outbound;

pub use inbound::runtime::{ControlAction, MonitorControl};
pub use outbound::dedup::DeliveredLog;
pub use outbound::notifier::{DisabledSink, NotificationSink, SinkReceipt};
pub use outbound::source::{TradePage, TradeSource};
