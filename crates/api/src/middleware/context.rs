use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spectra_core::context::CallContext;

use crate::error::AppError;
use crate::state::AppState;

/// The [`CallContext`] a handler passes to the telemetry service.
///
/// Carries the configured store deadline. A client disconnect drops the
/// handler future, and with it any in-flight store call.
pub struct RequestContext(pub CallContext);

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestContext(
            CallContext::new().timeout(state.config.store_timeout()),
        ))
    }
}
