//! Infrastructure configuration modules.

pub mod dedup;
pub mod logging;
pub mod server;
pub mod settings;
pub mod source;
pub mod webhook;
