//! Outbound adapters (driven side).

pub mod file;
pub mod sqlite;
pub mod trade_api;
pub mod webhook;
