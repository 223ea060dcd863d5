//! Request extractors shared by the telemetry handlers.
//!
//! - [`json::ValidJson`] -- JSON body whose rejections become `VALIDATION_ERROR`.
//! - [`json::ValidQuery`] -- the same for query strings.
//! - [`context::RequestContext`] -- per-request [`spectra_core::context::CallContext`]
//!   carrying the store deadline.

pub mod context;
pub mod json;
