//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the two external dependencies of the forwarding
//! pipeline (trade source and notification sink) and the optional durable
//! storage behind the dedup store.

pub mod dedup;
pub mod notifier;
pub mod source;
