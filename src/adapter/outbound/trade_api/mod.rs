//! HTTP trade source.
//!
//! Reads the paginated trade API with a static `api-token` header.

mod client;
mod dto;

pub use client::{TradeApiClient, TradeApiSettings};
pub use dto::PageResponse;
