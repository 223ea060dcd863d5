//! Handlers for `/api/custom-events`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value};
use spectra_core::query::RangeParams;
use spectra_core::telemetry::{CustomEvent, Extra};

use super::resolve_range;
use crate::error::AppResult;
use crate::middleware::context::RequestContext;
use crate::middleware::json::{ValidJson, ValidQuery};
use crate::response::created;
use crate::state::AppState;

/// Query flag that turns the remaining query parameters into `extra`.
const PARSE_EXTRA: &str = "parse_extra";

/// POST /api/custom-events[?parse_extra=true&key=value...]
///
/// With `parse_extra=true`, every other query parameter is collected into a
/// string object that replaces the body's `extra`, provided there is at least
/// one such parameter. A repeated key keeps its first value.
pub async fn create(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(query): ValidQuery<Vec<(String, String)>>,
    ValidJson(mut event): ValidJson<CustomEvent>,
) -> AppResult<impl IntoResponse> {
    if let Some(extra) = extra_from_query(&query) {
        event.envelope.extra = extra;
    }
    state.telemetry.record_custom_event(&ctx, event).await?;
    Ok(created("Custom event recorded successfully"))
}

/// GET /api/custom-events?project_id=&start_time=&end_time=&name=
pub async fn list(
    State(state): State<AppState>,
    RequestContext(ctx): RequestContext,
    ValidQuery(params): ValidQuery<RangeParams>,
) -> AppResult<Json<Vec<CustomEvent>>> {
    let filter = resolve_range(&params)?;
    let events = state.telemetry.list_custom_events(&ctx, &filter).await?;
    Ok(Json(events))
}

fn extra_from_query(query: &[(String, String)]) -> Option<Extra> {
    let flag = query.iter().find(|(key, _)| key == PARSE_EXTRA);
    if flag.map(|(_, value)| value.as_str()) != Some("true") {
        return None;
    }

    let mut extra = Map::new();
    for (key, value) in query.iter().filter(|(key, _)| key != PARSE_EXTRA) {
        extra
            .entry(key.clone())
            .or_insert_with(|| Value::String(value.clone()));
    }

    (!extra.is_empty()).then(|| Extra::from_value(&Value::Object(extra)))
}
