//! Repository for the `user_actions` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::UserAction;

use super::envelope::{
    bind_envelope, bind_range, decode_envelope, placeholders, ENVELOPE_COLUMNS,
    ENVELOPE_PARAMS, NEWEST_FIRST, RANGE_WHERE,
};

const KIND_COLUMNS: &str = "message, method, status, value";

/// Provides query operations for user actions.
pub struct UserActionRepo;

impl UserActionRepo {
    pub async fn insert(pool: &PgPool, action: &UserAction) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO user_actions ({ENVELOPE_COLUMNS}, {KIND_COLUMNS}) VALUES ({})",
            placeholders(1, ENVELOPE_PARAMS + 4)
        );
        bind_envelope(sqlx::query(&query), &action.envelope)
            .bind(&action.message)
            .bind(&action.method)
            .bind(i32::from(action.status))
            .bind(action.value)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn query_range(
        pool: &PgPool,
        filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, sqlx::Error> {
        let query = format!(
            "SELECT {ENVELOPE_COLUMNS}, {KIND_COLUMNS} FROM user_actions \
             {RANGE_WHERE} {NEWEST_FIRST}"
        );
        bind_range(sqlx::query(&query), filter)
            .try_map(|row: PgRow| decode(&row))
            .fetch_all(pool)
            .await
    }
}

fn decode(row: &PgRow) -> Result<UserAction, sqlx::Error> {
    let status: i32 = row.try_get("status")?;
    let status = u16::try_from(status).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(e),
    })?;

    Ok(UserAction {
        envelope: decode_envelope(row)?,
        message: row.try_get("message")?,
        method: row.try_get("method")?,
        status,
        value: row.try_get("value")?,
    })
}
