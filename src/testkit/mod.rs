//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - `ScriptedSource`, a [`TradeSource`](crate::port::TradeSource)
//!   serving scripted pages with failure injection and concurrency tracking.
//! - [`sink`] - `RecordingSink`, a [`NotificationSink`](crate::port::NotificationSink)
//!   recording attempts with tokio timestamps.
//! - [`trade`] - Builders for trades.

pub mod sink;
pub mod source;
pub mod trade;
