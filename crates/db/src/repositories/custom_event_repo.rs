//! Repository for the `custom_events` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::CustomEvent;

use super::envelope::{
    bind_envelope, bind_range, decode_envelope, placeholders, ENVELOPE_COLUMNS,
    ENVELOPE_PARAMS, NEWEST_FIRST, RANGE_WHERE,
};

/// Provides query operations for custom events.
pub struct CustomEventRepo;

impl CustomEventRepo {
    pub async fn insert(pool: &PgPool, event: &CustomEvent) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_events ({ENVELOPE_COLUMNS}, message) VALUES ({})",
            placeholders(1, ENVELOPE_PARAMS + 1)
        );
        bind_envelope(sqlx::query(&query), &event.envelope)
            .bind(&event.message)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn query_range(
        pool: &PgPool,
        filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, message FROM custom_events \
             {RANGE_WHERE} {NEWEST_FIRST}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| decode(&row))
            .fetch_all(pool)
            .await
    }
}

fn decode(row: &PgRow) -> Result<CustomEvent, sqlx::Error> {
    Ok(CustomEvent {
        envelope: decode_envelope(row)?,
        message: row.try_get("message")?,
    })
}
