use axum::routing::get;
use axum::Router;

use crate::handlers::page_stay;
use crate::state::AppState;

/// Routes mounted at `/api/page-stays`.
///
/// ```text
/// POST /           record
/// GET  /           list in window
/// GET  /average    mean duration in window
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page_stay::list).post(page_stay::create))
        .route("/average", get(page_stay::average))
}
