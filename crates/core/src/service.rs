//! Telemetry service: normalization in front of a [`TelemetryStore`].
//!
//! Ingest operations reject strings holding NUL, normalize the record and
//! persist it once. Read operations
//! take an already validated [`RangeFilter`], so an unscoped query can never
//! reach the store.

use std::sync::Arc;

use chrono::Utc;

use crate::context::CallContext;
use crate::error::CoreError;
use crate::normalize::normalize;
use crate::query::RangeFilter;
use crate::store::TelemetryStore;
use crate::telemetry::{
    CustomEvent, ErrorLog, PageStay, PerformanceMetric, TelemetryRecord, UserAction,
};

/// Cheaply cloneable handle shared by all request handlers.
#[derive(Clone)]
pub struct TelemetryService {
    store: Arc<dyn TelemetryStore>,
}

impl TelemetryService {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }

    /// Check that the backing store is reachable.
    pub async fn ping(&self, ctx: &CallContext) -> Result<(), CoreError> {
        ctx.run("store ping", self.store.ping()).await
    }

    // -----------------------------------------------------------------------
    // Error logs
    // -----------------------------------------------------------------------

    /// Normalize and persist an error log. Returns the stored record.
    pub async fn record_error_log(
        &self,
        ctx: &CallContext,
        log: ErrorLog,
    ) -> Result<ErrorLog, CoreError> {
        let log = prepare(log)?;
        ctx.run("save error log", self.store.save_error_log(&log))
            .await?;
        log_recorded(&log);
        Ok(log)
    }

    pub async fn list_error_logs(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<Vec<ErrorLog>, CoreError> {
        let logs = ctx
            .run("query error logs", self.store.query_error_logs(filter))
            .await?;
        log_fetched::<ErrorLog>(filter, logs.len());
        Ok(logs)
    }

    /// Look up one error log by trace id. `Ok(None)` when nothing matches.
    pub async fn error_log_by_trace_id(
        &self,
        ctx: &CallContext,
        trace_id: &str,
    ) -> Result<Option<ErrorLog>, CoreError> {
        if trace_id.is_empty() {
            return Err(CoreError::Validation("trace_id is required".into()));
        }
        let found = ctx
            .run(
                "find error log by trace id",
                self.store.find_error_log_by_trace_id(trace_id),
            )
            .await?;
        tracing::debug!(trace_id, found = found.is_some(), "Error log trace lookup");
        Ok(found)
    }

    // -----------------------------------------------------------------------
    // Performance metrics
    // -----------------------------------------------------------------------

    pub async fn record_performance_metric(
        &self,
        ctx: &CallContext,
        metric: PerformanceMetric,
    ) -> Result<PerformanceMetric, CoreError> {
        let metric = prepare(metric)?;
        ctx.run(
            "save performance metric",
            self.store.save_performance_metric(&metric),
        )
        .await?;
        log_recorded(&metric);
        Ok(metric)
    }

    /// Metrics in the window; narrowed to one metric name when the filter
    /// carries one.
    pub async fn list_performance_metrics(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, CoreError> {
        let metrics = ctx
            .run(
                "query performance metrics",
                self.store.query_performance_metrics(filter),
            )
            .await?;
        log_fetched::<PerformanceMetric>(filter, metrics.len());
        Ok(metrics)
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    pub async fn record_user_action(
        &self,
        ctx: &CallContext,
        action: UserAction,
    ) -> Result<UserAction, CoreError> {
        let action = prepare(action)?;
        ctx.run("save user action", self.store.save_user_action(&action))
            .await?;
        log_recorded(&action);
        Ok(action)
    }

    pub async fn list_user_actions(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, CoreError> {
        let actions = ctx
            .run("query user actions", self.store.query_user_actions(filter))
            .await?;
        log_fetched::<UserAction>(filter, actions.len());
        Ok(actions)
    }

    // -----------------------------------------------------------------------
    // Custom events
    // -----------------------------------------------------------------------

    pub async fn record_custom_event(
        &self,
        ctx: &CallContext,
        event: CustomEvent,
    ) -> Result<CustomEvent, CoreError> {
        let event = prepare(event)?;
        ctx.run("save custom event", self.store.save_custom_event(&event))
            .await?;
        log_recorded(&event);
        Ok(event)
    }

    pub async fn list_custom_events(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, CoreError> {
        let events = ctx
            .run("query custom events", self.store.query_custom_events(filter))
            .await?;
        log_fetched::<CustomEvent>(filter, events.len());
        Ok(events)
    }

    // -----------------------------------------------------------------------
    // Page stays
    // -----------------------------------------------------------------------

    pub async fn record_page_stay(
        &self,
        ctx: &CallContext,
        stay: PageStay,
    ) -> Result<PageStay, CoreError> {
        let stay = prepare(stay)?;
        ctx.run("save page stay", self.store.save_page_stay(&stay))
            .await?;
        log_recorded(&stay);
        Ok(stay)
    }

    pub async fn list_page_stays(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<Vec<PageStay>, CoreError> {
        let stays = ctx
            .run("query page stays", self.store.query_page_stays(filter))
            .await?;
        log_fetched::<PageStay>(filter, stays.len());
        Ok(stays)
    }

    /// Mean page stay over the window. `0.0` when there are no page stays,
    /// which callers cannot tell apart from a true zero average.
    pub async fn average_page_stay(
        &self,
        ctx: &CallContext,
        filter: &RangeFilter,
    ) -> Result<f64, CoreError> {
        let filter = filter.clone().without_name();
        let average = ctx
            .run("average page stay", self.store.average_page_stay(&filter))
            .await?;
        tracing::debug!(
            project_id = filter.project_id(),
            start_time = %filter.start(),
            end_time = %filter.end(),
            average,
            "Computed average page stay"
        );
        Ok(average)
    }
}

/// Reject records PostgreSQL cannot store, then fill their defaults.
fn prepare<R: TelemetryRecord>(record: R) -> Result<R, CoreError> {
    if let Some(field) = record.nul_field() {
        return Err(CoreError::Validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(normalize(record, Utc::now()))
}

fn log_recorded<R: TelemetryRecord>(record: &R) {
    let envelope = record.envelope();
    tracing::debug!(
        kind = R::KIND.label(),
        project_id = %envelope.project_id,
        trace_id = %envelope.trace_id,
        record_type = %envelope.record_type,
        name = %envelope.name,
        timestamp = %envelope.timestamp,
        "Telemetry record stored"
    );
}

fn log_fetched<R: TelemetryRecord>(filter: &RangeFilter, count: usize) {
    tracing::debug!(
        kind = R::KIND.label(),
        project_id = filter.project_id(),
        name = filter.name(),
        start_time = %filter.start(),
        end_time = %filter.end(),
        count,
        "Telemetry records fetched"
    );
}
