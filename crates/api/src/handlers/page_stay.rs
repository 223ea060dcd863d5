//! Handlers for `/api/page-stays`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use spectra_core::query::RangeParams;
use spectra_core::telemetry::PageStay;

use super::resolve_range;
use crate::error::AppResult;
use crate::middleware::context::RequestContext;
use crate::middleware::json::{ValidJson, ValidQuery};
use crate::response::{created, AveragePageStayResponse};
use crate::state::AppState;

/// POST /api/page-stays
pub async fn create(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidJson(stay): ValidJson<PageStay>,
) -> AppResult<impl IntoResponse> {
    state.telemetry.record_page_stay(&ctx, stay).await?;
    Ok(created("Page stay recorded successfully"))
}

/// GET /api/page-stays?project_id=&start_time=&end_time=&name=
pub async fn list(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<Vec<PageStay>>> {
    let filter = resolve_range(&params)?;
    let stays = state.telemetry.list_page_stays(&ctx, &filter).await?;
    Ok(Json(stays))
}

/// GET /api/page-stays/average?project_id=&start_time=&end_time=
///
/// `0.0` when the window holds no page stays.
pub async fn average(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<AveragePageStayResponse>> {
    let filter = resolve_range(&params)?;
    let average_page_stay = state.telemetry.average_page_stay(&ctx, &filter).await?;
    Ok(Json(AveragePageStayResponse { average_page_stay }))
}
