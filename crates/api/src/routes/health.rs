//! Liveness plus a database round trip.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// False when a dependency is down.
    pub success: bool,
    /// `healthy` or `degraded`.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
}

impl HealthResponse {
    fn new(database_up: bool) -> Self {
        Self {
            success: database_up,
            status: if database_up { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database: if database_up { "up" } else { "down" },
        }
    }
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Response {
    let database_up = match tokio::time::timeout(state.storage_timeout, state.db.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "Database ping failed");
            false
        }
        Err(_) => {
            warn!(timeout = ?state.storage_timeout, "Database ping timed out");
            false
        }
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::new(database_up))).into_response()
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
