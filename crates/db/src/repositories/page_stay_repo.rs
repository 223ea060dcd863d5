//! Repository for the `page_stay` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::PageStay;

use super::envelope::{
    bind_envelope, bind_range, decode_envelope, placeholders, ENVELOPE_COLUMNS,
    ENVELOPE_PARAMS, NEWEST_FIRST, RANGE_WHERE,
};

/// Provides query operations for page stays.
pub struct PageStayRepo;

impl PageStayRepo {
    pub async fn insert(pool: &PgPool, stay: &PageStay) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO page_stay ({ENVELOPE_COLUMNS}, value) VALUES ({})",
            placeholders(1, ENVELOPE_PARAMS + 1)
        );
        bind_envelope(sqlx::query(&query), &stay.envelope)
            .bind(stay.value)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn query_range(
        pool: &PgPool,
        filter: &RangeFilter,
    ) -> Result<Vec<PageStay>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, value FROM page_stay {RANGE_WHERE} {NEWEST_FIRST}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| decode(&row))
            .fetch_all(pool)
            .await
    }

    /// Mean `value` inside the window, `0.0` when no rows match. The `name`
    /// narrowing of `filter` is honoured if present.
    pub async fn average(pool: &PgPool, filter: &RangeFilter) -> Result<f64, sqlx::Error> {
        let query = format!(
            "SELECT COALESCE(AVG(value), 0)::FLOAT8 FROM page_stay {RANGE_WHERE}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| row.try_get::<f64, _>(0))
            .fetch_one(pool)
            .await
    }
}

fn decode(row: &PgRow) -> Result<PageStay, sqlx::Error> {
    Ok(PageStay {
        envelope: decode_envelope(row)?,
        value: row.try_get("value")?,
    })
}
