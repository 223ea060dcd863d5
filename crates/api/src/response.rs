//! Response bodies shared by the telemetry handlers.
//!
//! List endpoints return bare JSON arrays of records; ingest endpoints return
//! a [`MessageResponse`] with `201 Created`.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `201 Created` with a `{ "message": ... }` body.
pub fn created(message: &'static str) -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::CREATED, Json(MessageResponse { message }))
}

/// Body of `GET /api/page-stays/average`.
#[derive(Debug, Serialize)]
pub struct AveragePageStayResponse {
    pub average_page_stay: f64,
}
