//! HTTP control surface.
//!
//! - `GET /health` liveness plus monitor stats
//! - `GET /stats` monitor stats
//! - `POST /control/{start|stop|restart}` lifecycle actions

mod server;

pub use server::{bind, router, serve};
