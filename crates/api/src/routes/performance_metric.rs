use axum::routing::get;
use axum::Router;

use crate::handlers::performance_metric;
use crate::state::AppState;

/// Routes mounted at `/api/performance-metrics`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(performance_metric::list).post(performance_metric::create))
}
