use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TelemetryStore};
use crate::query::RangeFilter;
use crate::telemetry::{
    CustomEvent, ErrorLog, PageStay, PerformanceMetric, TelemetryRecord, UserAction,
};

#[derive(Debug, Default)]
struct Tables {
    error_logs: Vec<ErrorLog>,
    performance_metrics: Vec<PerformanceMetric>,
    user_actions: Vec<UserAction>,
    custom_events: Vec<CustomEvent>,
    page_stays: Vec<PageStay>,
}

/// Append-only in-process store with the same query semantics as the
/// database gateway.
#[derive(Debug, Default)]
pub struct MemoryTelemetryStore {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations invoked so far, `ping` included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Rows matching `filter`, newest first. Ties keep the most recently inserted
/// row first.
fn select<R: TelemetryRecord>(rows: &[R], filter: &RangeFilter) -> Vec<R> {
    let mut matched: Vec<R> = rows
        .iter()
        .rev()
        .filter(|row| filter.matches(row.envelope()))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.envelope().timestamp.cmp(&a.envelope().timestamp));
    matched
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.record_call();
        Ok(())
    }

    async fn save_error_log(&self, log: &ErrorLog) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.error_logs.push(log.clone());
        Ok(())
    }

    async fn query_error_logs(&self, filter: &RangeFilter) -> Result<Vec<ErrorLog>, StoreError> {
        self.record_call();
        Ok(select(&self.tables.read().await.error_logs, filter))
    }

    async fn find_error_log_by_trace_id(
        &self,
        trace_id: &str,
    ) -> Result<Option<ErrorLog>, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        Ok(tables
            .error_logs
            .iter()
            .filter(|log| log.envelope.trace_id == trace_id)
            .max_by_key(|log| log.envelope.timestamp)
            .cloned())
    }

    async fn save_performance_metric(&self, metric: &PerformanceMetric) -> Result<(), StoreError> {
        self.record_call();
        self.tables
            .write()
            .await
            .performance_metrics
            .push(metric.clone());
        Ok(())
    }

    async fn query_performance_metrics(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, StoreError> {
        self.record_call();
        Ok(select(&self.tables.read().await.performance_metrics, filter))
    }

    async fn save_user_action(&self, action: &UserAction) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.user_actions.push(action.clone());
        Ok(())
    }

    async fn query_user_actions(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, StoreError> {
        self.record_call();
        Ok(select(&self.tables.read().await.user_actions, filter))
    }

    async fn save_custom_event(&self, event: &CustomEvent) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.custom_events.push(event.clone());
        Ok(())
    }

    async fn query_custom_events(
        &self,
        filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, StoreError> {
        self.record_call();
        Ok(select(&self.tables.read().await.custom_events, filter))
    }

    async fn save_page_stay(&self, stay: &PageStay) -> Result<(), StoreError> {
        self.record_call();
        self.tables.write().await.page_stays.push(stay.clone());
        Ok(())
    }

    async fn query_page_stays(&self, filter: &RangeFilter) -> Result<Vec<PageStay>, StoreError> {
        self.record_call();
        Ok(select(&self.tables.read().await.page_stays, filter))
    }

    async fn average_page_stay(&self, filter: &RangeFilter) -> Result<f64, StoreError> {
        self.record_call();
        let tables = self.tables.read().await;
        let (sum, count) = tables
            .page_stays
            .iter()
            .filter(|stay| filter.matches(&stay.envelope))
            .fold((0.0_f64, 0_usize), |(sum, count), stay| {
                (sum + stay.value, count + 1)
            });
        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum / count as f64)
    }
}
