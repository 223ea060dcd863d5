use axum::routing::get;
use axum::Router;

use crate::handlers::custom_event;
use crate::state::AppState;

/// Routes mounted at `/api/custom-events`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(custom_event::list).post(custom_event::create))
}
