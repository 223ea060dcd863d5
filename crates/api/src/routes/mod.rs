pub mod custom_event;
pub mod error_log;
pub mod health;
pub mod page_stay;
pub mod performance_metric;
pub mod user_action;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /error-logs                      record (POST), list (GET)
/// /error-logs/{trace_id}           lookup by trace id (GET)
///
/// /performance-metrics             record (POST), list (GET, optional name)
///
/// /user-actions                    record (POST), list (GET, optional name)
///
/// /custom-events                   record (POST, parse_extra), list (GET, optional name)
///
/// /page-stays                      record (POST), list (GET)
/// /page-stays/average              average duration (GET)
/// ```
///
/// Every list endpoint takes `project_id` (required), `start_time` and
/// `end_time` (RFC 3339, default: the trailing 24 hours).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/error-logs", error_log::router())
        .nest("/performance-metrics", performance_metric::router())
        .nest("/user-actions", user_action::router())
        .nest("/custom-events", custom_event::router())
        .nest("/page-stays", page_stay::router())
}
