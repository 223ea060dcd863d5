//! HTTP handlers, one module per record kind.
//!
//! Handlers are thin: extract, resolve the query window, call
//! [`spectra_core::service::TelemetryService`], serialize.

pub mod custom_event;
pub mod error_log;
pub mod page_stay;
pub mod performance_metric;
pub mod user_action;

use chrono::Utc;
use spectra_core::query::{RangeFilter, RangeParams};

use crate::error::AppResult;

/// Validate list query parameters against the current time.
fn resolve_range(params: &RangeParams) -> AppResult<RangeFilter> {
    Ok(params.resolve(Utc::now())?)
}
