//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod cors;
mod handlers;
mod rate_limit;
mod server;

pub use cors::CorsPolicy;
pub use rate_limit::{Allowance, DEFAULT_MAX, DEFAULT_WINDOW, RateLimiterState};
pub use server::{BODY_LIMIT_BYTES, HEALTH_PATH, HttpOptions, HttpServer, shutdown_signal};
