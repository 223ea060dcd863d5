use axum::routing::get;
use axum::Router;

use crate::handlers::user_action;
use crate::state::AppState;

/// Routes mounted at `/api/user-actions`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(user_action::list).post(user_action::create))
}
