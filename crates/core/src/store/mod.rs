//! Storage seam for telemetry records.
//!
//! [`TelemetryStore`] is implemented by the PostgreSQL gateway in
//! `spectra-db` and by [`MemoryTelemetryStore`] for tests and local runs.
//! Implementations never retry; every failure surfaces as a [`StoreError`].

mod memory;

pub use memory::MemoryTelemetryStore;

use async_trait::async_trait;

use crate::query::RangeFilter;
use crate::telemetry::{CustomEvent, ErrorLog, PageStay, PerformanceMetric, UserAction};

/// Boxed error type carried by [`StoreError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a storage backend (connectivity, malformed statement,
/// constraint violation, undecodable row).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }
}

/// Persistence and range queries for the five record kinds.
///
/// List queries return rows matching the filter (project, closed time window
/// and optional `name`) ordered by `timestamp` descending, and an empty `Vec`
/// when nothing matches.
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Round-trip to the backend to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn save_error_log(&self, log: &ErrorLog) -> Result<(), StoreError>;

    async fn query_error_logs(&self, filter: &RangeFilter) -> Result<Vec<ErrorLog>, StoreError>;

    /// At most one error log with this exact `trace_id`. When several share
    /// it, the most recent one is returned.
    async fn find_error_log_by_trace_id(
        &self,
        trace_id: &str,
    ) -> Result<Option<ErrorLog>, StoreError>;

    async fn save_performance_metric(&self, metric: &PerformanceMetric) -> Result<(), StoreError>;

    async fn query_performance_metrics(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, StoreError>;

    async fn save_user_action(&self, action: &UserAction) -> Result<(), StoreError>;

    async fn query_user_actions(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, StoreError>;

    async fn save_custom_event(&self, event: &CustomEvent) -> Result<(), StoreError>;

    async fn query_custom_events(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, StoreError>;

    async fn save_page_stay(&self, stay: &PageStay) -> Result<(), StoreError>;

    async fn query_page_stays(&self, filter: &RangeFilter) -> Result<Vec<PageStay>, StoreError>;

    /// Mean of `value` over the matching page stays; `0.0` when none match.
    async fn average_page_stay(&self, filter: &RangeFilter) -> Result<f64, StoreError>;
}
