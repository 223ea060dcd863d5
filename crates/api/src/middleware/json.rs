use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use spectra_core::error::CoreError;

use crate::error::AppError;

/// Drop-in replacement for [`Json`] that rejects malformed bodies with a
/// `400 VALIDATION_ERROR` in the standard error shape.
///
/// ```ignore
/// async fn create(ValidJson(log): ValidJson<ErrorLog>) -> AppResult<impl IntoResponse> { .. }
/// ```
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    AppError::Core(CoreError::Validation(format!(
        "Invalid request body: {}",
        rejection.body_text()
    )))
}

/// Drop-in replacement for [`Query`] with the same error shape as
/// [`ValidJson`]: a malformed or ambiguous query string is a
/// `400 VALIDATION_ERROR`, never a plain-text rejection.
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ValidQuery(value)),
            Err(rejection) => Err(query_rejection_to_error(rejection)),
        }
    }
}

fn query_rejection_to_error(rejection: QueryRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected query string");
    AppError::Core(CoreError::Validation(format!(
        "Invalid query string: {}",
        rejection.body_text()
    )))
}
