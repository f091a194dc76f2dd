//! HTTP layer
//!
//! Axum server with:
//! - One URL per collection, `?action=` dispatch
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON success/error envelopes

pub mod action;
pub mod error;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod server;

#[cfg(test)]
mod tests;

pub use action::{Action, Endpoint};
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
