//! [`TelemetryStore`] over a PostgreSQL pool.

use async_trait::async_trait;

use spectra_core::query::RangeFilter;
use spectra_core::store::{StoreError, TelemetryStore};
use spectra_core::telemetry::{CustomEvent, ErrorLog, PageStay, PerformanceMetric, UserAction};

use crate::repositories::{
    CustomEventRepo, ErrorLogRepo, PageStayRepo, PerformanceMetricRepo, UserActionRepo,
};
use crate::DbPool;

/// PostgreSQL-backed store. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgTelemetryStore {
    pool: DbPool,
}

impl PgTelemetryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn save_error_log(&self, log: &ErrorLog) -> Result<(), StoreError> {
        ErrorLogRepo::insert(&self.pool, log)
            .await
            .map_err(StoreError::backend)
    }

    async fn query_error_logs(&self, filter: &RangeFilter) -> Result<Vec<ErrorLog>, StoreError> {
        ErrorLogRepo::query_range(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn find_error_log_by_trace_id(
        &self,
        trace_id: &str,
    ) -> Result<Option<ErrorLog>, StoreError> {
        ErrorLogRepo::find_by_trace_id(&self.pool, trace_id)
            .await
            .map_err(StoreError::backend)
    }

    async fn save_performance_metric(&self, metric: &PerformanceMetric) -> Result<(), StoreError> {
        PerformanceMetricRepo::insert(&self.pool, metric)
            .await
            .map_err(StoreError::backend)
    }

    async fn query_performance_metrics(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, StoreError> {
        PerformanceMetricRepo::query_range(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn save_user_action(&self, action: &UserAction) -> Result<(), StoreError> {
        UserActionRepo::insert(&self.pool, action)
            .await
            .map_err(StoreError::backend)
    }

    async fn query_user_actions(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, StoreError> {
        UserActionRepo::query_range(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn save_custom_event(&self, event: &CustomEvent) -> Result<(), StoreError> {
        CustomEventRepo::insert(&self.pool, event)
            .await
            .map_err(StoreError::backend)
    }

    async fn query_custom_events(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, StoreError> {
        CustomEventRepo::query_range(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn save_page_stay(&self, stay: &PageStay) -> Result<(), StoreError> {
        PageStayRepo::insert(&self.pool, stay)
            .await
            .map_err(StoreError::backend)
    }

    async fn query_page_stays(&self, filter: &RangeFilter) -> Result<Vec<PageStay>, StoreError> {
        PageStayRepo::query_range(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }

    async fn average_page_stay(&self, filter: &RangeFilter) -> Result<f64, StoreError> {
        PageStayRepo::average(&self.pool, filter)
            .await
            .map_err(StoreError::backend)
    }
}
