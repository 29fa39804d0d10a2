//! Configuration and connectivity check command handlers.

pub mod config;
pub mod source;
pub mod webhook;
