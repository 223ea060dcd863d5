//! Repository for the `performance_metrics` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::PerformanceMetric;

use super::envelope::{
    bind_envelope, bind_range, decode_envelope, placeholders, ENVELOPE_COLUMNS,
    ENVELOPE_PARAMS, NEWEST_FIRST, RANGE_WHERE,
};

/// Provides query operations for performance metrics.
pub struct PerformanceMetricRepo;

impl PerformanceMetricRepo {
    pub async fn insert(pool: &PgPool, metric: &PerformanceMetric) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO performance_metrics ({ENVELOPE_COLUMNS}, value) VALUES ({})",
            placeholders(1, ENVELOPE_PARAMS + 1)
        );
        bind_envelope(sqlx::query(&query), &metric.envelope)
            .bind(metric.value)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Metrics for a project inside the window, optionally for one metric
    /// name, newest first.
    pub async fn query_range(
        pool: &PgPool,
        filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, value FROM performance_metrics \
             {RANGE_WHERE} {NEWEST_FIRST}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| decode(&row))
            .fetch_all(pool)
            .await
    }
}

fn decode(row: &PgRow) -> Result<PerformanceMetric, sqlx::Error> {
    Ok(PerformanceMetric {
        envelope: decode_envelope(row)?,
        value: row.try_get("value")?,
    })
}
