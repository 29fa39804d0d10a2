//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`runtime`]: Monitor lifecycle control and statistics

pub mod runtime;
