//! Handlers for `/api/user-actions`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use spectra_core::query::RangeParams;
use spectra_core::telemetry::UserAction;

use super::resolve_range;
use crate::error::AppResult;
use crate::middleware::context::RequestContext;
use crate::middleware::json::{ValidJson, ValidQuery};
use crate::response::created;
use crate::state::AppState;

/// POST /api/user-actions
pub async fn create(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidJson(action): ValidJson<UserAction>,
) -> AppResult<impl IntoResponse> {
    state.telemetry.record_user_action(&ctx, action).await?;
    Ok(created("User action recorded successfully"))
}

/// GET /api/user-actions?project_id=&start_time=&end_time=&name=
pub async fn list(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<Vec<UserAction>>> {
    let filter = resolve_range(&params)?;
    let actions = state.telemetry.list_user_actions(&ctx, &filter).await?;
    Ok(Json(actions))
}
