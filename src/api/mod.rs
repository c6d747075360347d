//! HTTP API layer.
//!
//! - [`server`] - axum router and handlers
//! - [`types`] - request/response helpers
//! - [`logs`] - log broadcast channel with SSE streaming

pub mod logs;
pub mod server;
pub mod types;
