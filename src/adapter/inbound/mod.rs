//! Inbound adapters (driving side): the CLI and the HTTP control server.

pub mod cli;
pub mod http;
