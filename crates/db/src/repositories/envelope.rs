//! Envelope columns shared by every telemetry table.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};

use spectra_core::query::RangeFilter;
use spectra_core::telemetry::{Envelope, Extra};
use spectra_core::types::Timestamp;

/// Envelope column list, in bind order.
pub const ENVELOPE_COLUMNS: &str = "\
    timestamp, project_id, session_id, trace_id, user_id, url, referrer, \
    type, name, extra";

/// Number of placeholders taken by [`bind_envelope`].
pub const ENVELOPE_PARAMS: usize = 10;

/// `WHERE` clause for a range query. `$1` project, `$2`/`$3` inclusive window,
/// `$4` optional name (NULL matches every name).
pub const RANGE_WHERE: &str = "\
    WHERE project_id = $1 \
      AND timestamp >= $2 AND timestamp <= $3 \
      AND ($4::TEXT IS NULL OR name = $4)";

/// Newest first; `id` breaks ties between rows sharing a timestamp.
pub const NEWEST_FIRST: &str = "ORDER BY timestamp DESC, id DESC";

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Bind the envelope fields in [`ENVELOPE_COLUMNS`] order.
///
/// `extra` is stored as the client's JSON text, untouched, so the payload
/// comes back with the same digits and key order it arrived with.
pub fn bind_envelope<'q>(query: PgQuery<'q>, envelope: &'q Envelope) -> PgQuery<'q> {
    query
        .bind(envelope.timestamp)
        .bind(&envelope.project_id)
        .bind(&envelope.session_id)
        .bind(&envelope.trace_id)
        .bind(&envelope.user_id)
        .bind(&envelope.url)
        .bind(&envelope.referrer)
        .bind(&envelope.record_type)
        .bind(&envelope.name)
        .bind(envelope.extra.as_str())
}

/// Bind the four [`RANGE_WHERE`] parameters.
pub fn bind_range<'q>(query: PgQuery<'q>, filter: &'q RangeFilter) -> PgQuery<'q> {
    query
        .bind(filter.project_id())
        .bind(filter.start())
        .bind(filter.end())
        .bind(filter.name())
}

/// `$first, $first+1, ...` for `count` placeholders.
pub fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn decode_envelope(row: &PgRow) -> Result<Envelope, sqlx::Error> {
    let extra: String = row.try_get("extra")?;
    let extra = Extra::from_json(&extra).map_err(|e| sqlx::Error::ColumnDecode {
        index: "extra".into(),
        source: Box::new(e),
    })?;

    Ok(Envelope {
        timestamp: row.try_get::<Timestamp, _>("timestamp")?,
        project_id: row.try_get("project_id")?,
        session_id: row.try_get("session_id")?,
        trace_id: row.try_get("trace_id")?,
        user_id: row.try_get("user_id")?,
        url: row.try_get("url")?,
        referrer: row.try_get("referrer")?,
        record_type: row.try_get("type")?,
        name: row.try_get("name")?,
        extra,
    })
}
