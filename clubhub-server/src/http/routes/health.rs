//! Health and status endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Status response with a database round-trip
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub database: bool,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/status - pings the store (connecting if nothing is cached yet)
async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let database = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            false
        }
    };

    Json(StatusResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
}
