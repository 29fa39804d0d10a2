//! Webhook notification sink.

mod signature;
mod sink;

pub use signature::{sign, verify, SIGNATURE_HEADER};
pub use sink::{WebhookSettings, WebhookSink};
