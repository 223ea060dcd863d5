//! Default-value normalization applied to every record before it is persisted.

use chrono::SubsecRound;

use crate::telemetry::{Extra, TelemetryRecord, ZERO_TIMESTAMP};
use crate::types::Timestamp;

/// Sub-second digits kept on stored timestamps (microseconds, the precision of
/// a PostgreSQL `TIMESTAMPTZ`).
pub const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

/// Fill the defaults of a freshly parsed record.
///
/// - a zero `timestamp` becomes `now`;
/// - an empty `type` becomes the kind's default;
/// - a `null` `extra` becomes `{}`;
/// - kind-specific defaults (custom event `message`, page stay `name`).
///
/// Timestamps are truncated to microseconds so a stored record reads back
/// identical to the normalized one. Applying this twice is a no-op.
pub fn normalize<R: TelemetryRecord>(mut record: R, now: Timestamp) -> R {
    let envelope = record.envelope_mut();

    if envelope.timestamp == ZERO_TIMESTAMP {
        envelope.timestamp = now;
    }
    envelope.timestamp = envelope.timestamp.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);

    if envelope.record_type.is_empty() {
        envelope.record_type = R::KIND.default_type().to_string();
    }

    if envelope.extra.is_null() {
        envelope.extra = Extra::empty_object();
    }

    record.fill_kind_defaults();
    record
}
