//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed delivered-trade log using Diesel ORM.

pub mod database;
pub mod log;

pub use log::SqliteDeliveredLog;
