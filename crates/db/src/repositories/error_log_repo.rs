//! Repository for the `error_logs` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::ErrorLog;

use super::envelope::{
    bind_envelope, bind_range, decode_envelope, placeholders, ENVELOPE_COLUMNS,
    ENVELOPE_PARAMS, NEWEST_FIRST, RANGE_WHERE,
};

/// Provides query operations for error logs.
pub struct ErrorLogRepo;

impl ErrorLogRepo {
    pub async fn insert(pool: &PgPool, log: &ErrorLog) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO error_logs ({ENVELOPE_COLUMNS}, message) VALUES ({})",
            placeholders(1, ENVELOPE_PARAMS + 1)
        );
        bind_envelope(sqlx::query(&query), &log.envelope)
            .bind(&log.message)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Error logs for a project inside the window, newest first.
    pub async fn query_range(
        pool: &PgPool,
        filter: &RangeFilter,
    ) -> Result<Vec<ErrorLog>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, message FROM error_logs {RANGE_WHERE} {NEWEST_FIRST}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| decode(&row))
            .fetch_all(pool)
            .await
    }

    /// The most recent error log carrying `trace_id`, if any.
    pub async fn find_by_trace_id(
        pool: &PgPool,
        trace_id: &str,
    ) -> Result<Option<ErrorLog>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, message FROM error_logs \
             WHERE trace_id = $1 {NEWEST_FIRST} LIMIT 1"
        );
        sqlx::query(&query)
            .bind(trace_id)
            .try_map(|row: PgRow| decode(&row))
            .fetch_optional(pool)
            .await
    }
}

fn decode(row: &PgRow) -> Result<ErrorLog, sqlx::Error> {
    Ok(ErrorLog {
        envelope: decode_envelope(row)?,
        message: row.try_get("message")?,
    })
}
