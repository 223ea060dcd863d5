use axum::routing::get;
use axum::Router;

use crate::handlers::error_log;
use crate::state::AppState;

/// Routes mounted at `/api/error-logs`.
///
/// ```text
/// POST /              record
/// GET  /              list in window
/// GET  /{trace_id}    single log by trace id (404 when absent)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(error_log::list).post(error_log::create))
        .route("/{trace_id}", get(error_log::get_by_trace_id))
}
