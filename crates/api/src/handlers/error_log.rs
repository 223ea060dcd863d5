//! Handlers for `/api/error-logs`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use spectra_core::error::CoreError;
use spectra_core::query::RangeParams;
use spectra_core::telemetry::ErrorLog;

use super::resolve_range;
use crate::error::AppResult;
use crate::middleware::context::RequestContext;
use crate::middleware::json::{ValidJson, ValidQuery};
use crate::response::created;
use crate::state::AppState;

/// POST /api/error-logs
pub async fn create(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidJson(log): ValidJson<ErrorLog>,
) -> AppResult<impl IntoResponse> {
    state.telemetry.record_error_log(&ctx, log).await?;
    Ok(created("Error log recorded successfully"))
}

/// GET /api/error-logs?project_id=&start_time=&end_time=
pub async fn list(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<Vec<ErrorLog>>> {
    let filter = resolve_range(&params)?;
    let logs = state.telemetry.list_error_logs(&ctx, &filter).await?;
    Ok(Json(logs))
}

/// GET /api/error-logs/{trace_id}
pub async fn get_by_trace_id(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    Path(trace_id): Path<String>,
) -> AppResult<Json<ErrorLog>> {
    let found = state.telemetry.error_log_by_trace_id(&ctx, &trace_id).await?;
    match found {
        Some(log) => Ok(Json(log)),
        None => Err(CoreError::NotFound {
            entity: "Error log with trace_id",
            key: trace_id,
        }
        .into()),
    }
}
