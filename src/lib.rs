//! tradewatch - forwards newly observed trades from a polled API to a webhook.
//!
//! A scan cycle fetches every page of the trade API, keeps trades in the
//! states of interest (OPEN, PROCESSING, PENDING), and delivers each one not
//! yet delivered to the webhook, retrying with exponential backoff. Confirmed
//! deliveries are recorded in a dedup store so later scans skip them.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Trades, events, snapshots and statistics
//! - [`port`] - Traits for the trade source, notification sink, delivered log
//!   and monitor control
//! - [`application`] - Dedup store, snapshot fetch, dispatcher, monitor
//! - [`adapter`] - HTTP trade API client, webhook sink, file and SQLite logs,
//!   the CLI and the HTTP control server
//! - [`infrastructure`] - Configuration, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted sources and recording sinks for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
