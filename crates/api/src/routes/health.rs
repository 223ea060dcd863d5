use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::middleware::context::RequestContext;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the telemetry store is reachable.
    pub db_healthy: bool,
}

/// Liveness payload.
#[derive(Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// GET /health -- returns service and store health.
async fn health_check(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
) -> Json<HealthResponse> {
    let db_healthy = match state.telemetry.ping(&ctx).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// GET /ping -- liveness only, never touches the store.
async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

/// Mount health routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
}
