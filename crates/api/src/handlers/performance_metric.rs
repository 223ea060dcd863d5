//! Handlers for `/api/performance-metrics`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use spectra_core::query::RangeParams;
use spectra_core::telemetry::PerformanceMetric;

use super::resolve_range;
use crate::error::AppResult;
use crate::middleware::context::RequestContext;
use crate::middleware::json::{ValidJson, ValidQuery};
use crate::response::created;
use crate::state::AppState;

/// POST /api/performance-metrics
pub async fn create(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidJson(metric): ValidJson<PerformanceMetric>,
) -> AppResult<impl IntoResponse> {
    state.telemetry.record_performance_metric(&ctx, metric).await?;
    Ok(created("Performance metric recorded successfully"))
}

/// GET /api/performance-metrics?project_id=&start_time=&end_time=&name=
///
/// `name` narrows the result to one metric (`LCP`, `CLS`, ...).
pub async fn list(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<Vec<PerformanceMetric>>> {
    let filter = resolve_range(&params)?;
    let metrics = state
        .telemetry
        .list_performance_metrics(&ctx, &filter)
        .await?;
    Ok(Json(metrics))
}
