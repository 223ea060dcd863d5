//! Telemetry record model.
//!
//! Five record kinds share one [`Envelope`]. On the wire a record is a single
//! flat JSON object with the envelope fields and the kind fields as siblings.
//! Records serialize through `#[serde(flatten)]` and deserialize through a
//! flat wire struct, because `extra` is kept as raw JSON text and raw values
//! cannot pass through serde's flatten buffer.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Timestamp value that stands for "not provided by the client".
pub const ZERO_TIMESTAMP: Timestamp = Timestamp::UNIX_EPOCH;

/// Default `type` for error logs.
pub const TYPE_ERROR: &str = "error";

/// Default `type` for performance metrics.
pub const TYPE_PERFORMANCE: &str = "performance";

/// Default `type` for user actions.
pub const TYPE_USER: &str = "user";

/// Default `type` for custom events.
pub const TYPE_CUSTOM: &str = "custom";

/// Default `type` for page stays.
pub const TYPE_PAGE_STAY: &str = "page_stay";

/// Default `message` for custom events that arrive without one.
pub const DEFAULT_CUSTOM_EVENT_MESSAGE: &str = "custom_event";

/// Default `name` for page stays that arrive without one.
pub const DEFAULT_PAGE_STAY_NAME: &str = "page_stay_time";

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

/// The closed set of telemetry categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ErrorLog,
    PerformanceMetric,
    UserAction,
    CustomEvent,
    PageStay,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::ErrorLog,
        RecordKind::PerformanceMetric,
        RecordKind::UserAction,
        RecordKind::CustomEvent,
        RecordKind::PageStay,
    ];

    /// Name of the table holding this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::ErrorLog => "error_logs",
            Self::PerformanceMetric => "performance_metrics",
            Self::UserAction => "user_actions",
            Self::CustomEvent => "custom_events",
            Self::PageStay => "page_stay",
        }
    }

    /// Value written to `type` when the client leaves it empty.
    pub fn default_type(self) -> &'static str {
        match self {
            Self::ErrorLog => TYPE_ERROR,
            Self::PerformanceMetric => TYPE_PERFORMANCE,
            Self::UserAction => TYPE_USER,
            Self::CustomEvent => TYPE_CUSTOM,
            Self::PageStay => TYPE_PAGE_STAY,
        }
    }

    /// Human-readable label used in log lines and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::ErrorLog => "error log",
            Self::PerformanceMetric => "performance metric",
            Self::UserAction => "user action",
            Self::CustomEvent => "custom event",
            Self::PageStay => "page stay",
        }
    }
}

// ---------------------------------------------------------------------------
// Extra payload
// ---------------------------------------------------------------------------

/// Opaque client payload, held as the exact JSON text the client sent.
///
/// Numbers, key order and whitespace inside the value are never reinterpreted,
/// so a big integer or a long decimal reads back digit for digit. The text is
/// always a single valid JSON value; equality is textual.
#[derive(Clone, PartialEq, Eq)]
pub struct Extra(String);

impl Extra {
    /// The `{}` payload that normalization substitutes for `null`.
    pub fn empty_object() -> Self {
        Self("{}".to_string())
    }

    /// Wrap JSON text, rejecting anything that is not a single JSON value.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: &RawValue = serde_json::from_str(text)?;
        Ok(Self(raw.get().to_string()))
    }

    /// Render a parsed value. Only used for payloads built server-side.
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == "null"
    }

    /// Parse the payload, for callers that need to look inside it.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }
}

impl Default for Extra {
    fn default() -> Self {
        Self(RawValue::NULL.get().to_string())
    }
}

impl fmt::Debug for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Extra {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: &RawValue = serde_json::from_str(&self.0).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Extra {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self(raw.get().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Fields common to every record kind.
///
/// Every string field defaults to `""` when absent. `timestamp` defaults to
/// [`ZERO_TIMESTAMP`] when absent or `null`, and `extra` to `null`; both are
/// replaced during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub trace_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub referrer: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub extra: Extra,
}

impl Envelope {
    /// First string field holding U+0000, which PostgreSQL `TEXT` refuses.
    fn nul_field(&self) -> Option<&'static str> {
        [
            ("project_id", &self.project_id),
            ("session_id", &self.session_id),
            ("trace_id", &self.trace_id),
            ("user_id", &self.user_id),
            ("url", &self.url),
            ("referrer", &self.referrer),
            ("type", &self.record_type),
            ("name", &self.name),
        ]
        .into_iter()
        .find_map(|(field, value)| value.contains('\0').then_some(field))
    }
}

fn nullable_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Timestamp>::deserialize(deserializer)?.unwrap_or(ZERO_TIMESTAMP))
}

/// Deserialize `T` from a JSON object only. A derived struct visitor would
/// also accept an array positionally.
fn deserialize_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct ObjectVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
            T::deserialize(MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_map(ObjectVisitor(PhantomData))
}

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

/// A client-side error report. Looked up individually by `trace_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorLog {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub message: String,
}

/// A named performance measurement such as `LCP` or `CLS`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceMetric {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub value: f64,
}

/// A user interaction, typically an outbound request made on the user's behalf.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserAction {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub message: String,
    pub method: String,
    pub status: u16,
    pub value: f64,
}

/// An application-defined event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomEvent {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub message: String,
}

/// Time spent on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageStay {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Shared record behaviour
// ---------------------------------------------------------------------------

/// Access to the envelope and kind-specific defaults of a record.
pub trait TelemetryRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn envelope(&self) -> &Envelope;

    fn envelope_mut(&mut self) -> &mut Envelope;

    /// Fill defaults that live outside the envelope's `timestamp`/`type`.
    fn fill_kind_defaults(&mut self) {}

    /// Name of the first string field containing a NUL character.
    fn nul_field(&self) -> Option<&'static str>;
}

/// Kind fields checked for NUL characters; only strings can hold one.
trait KindField {
    fn has_nul(&self) -> bool {
        false
    }
}

impl KindField for String {
    fn has_nul(&self) -> bool {
        self.contains('\0')
    }
}

impl KindField for f64 {}
impl KindField for u16 {}

/// Implements [`TelemetryRecord`] for a kind and generates its flat wire
/// struct: every envelope field plus the kind fields, all optional.
macro_rules! telemetry_record {
    (
        $ty:ident via $wire:ident, $kind:expr,
        { $($field:ident: $fty:ty),* $(,)? }
        $(, |$record:ident| $defaults:block)?
    ) => {
        #[derive(Deserialize)]
        struct $wire {
            #[serde(default, deserialize_with = "nullable_timestamp")]
            timestamp: Timestamp,
            #[serde(default)]
            project_id: String,
            #[serde(default)]
            session_id: String,
            #[serde(default)]
            trace_id: String,
            #[serde(default)]
            user_id: String,
            #[serde(default)]
            url: String,
            #[serde(default)]
            referrer: String,
            #[serde(rename = "type", default)]
            record_type: String,
            #[serde(default)]
            name: String,
            #[serde(default)]
            extra: Extra,
            $(
                #[serde(default)]
                $field: $fty,
            )*
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_object::<D, $wire>(deserializer).map(Self::from)
            }
        }

        impl From<$wire> for $ty {
            fn from(wire: $wire) -> Self {
                Self {
                    envelope: Envelope {
                        timestamp: wire.timestamp,
                        project_id: wire.project_id,
                        session_id: wire.session_id,
                        trace_id: wire.trace_id,
                        user_id: wire.user_id,
                        url: wire.url,
                        referrer: wire.referrer,
                        record_type: wire.record_type,
                        name: wire.name,
                        extra: wire.extra,
                    },
                    $($field: wire.$field,)*
                }
            }
        }

        impl TelemetryRecord for $ty {
            const KIND: RecordKind = $kind;

            fn envelope(&self) -> &Envelope {
                &self.envelope
            }

            fn envelope_mut(&mut self) -> &mut Envelope {
                &mut self.envelope
            }

            $(
                fn fill_kind_defaults(&mut self) {
                    let $record = self;
                    $defaults
                }
            )?

            fn nul_field(&self) -> Option<&'static str> {
                if let Some(field) = self.envelope.nul_field() {
                    return Some(field);
                }
                $(
                    if KindField::has_nul(&self.$field) {
                        return Some(stringify!($field));
                    }
                )*
                None
            }
        }
    };
}

telemetry_record!(ErrorLog via ErrorLogWire, RecordKind::ErrorLog, {
    message: String,
});
telemetry_record!(PerformanceMetric via PerformanceMetricWire, RecordKind::PerformanceMetric, {
    value: f64,
});
telemetry_record!(UserAction via UserActionWire, RecordKind::UserAction, {
    message: String,
    method: String,
    status: u16,
    value: f64,
});
telemetry_record!(
    CustomEvent via CustomEventWire,
    RecordKind::CustomEvent,
    { message: String },
    |event| {
        if event.message.is_empty() {
            event.message = DEFAULT_CUSTOM_EVENT_MESSAGE.to_string();
        }
    }
);
telemetry_record!(
    PageStay via PageStayWire,
    RecordKind::PageStay,
    { value: f64 },
    |stay| {
        if stay.envelope.name.is_empty() {
            stay.envelope.name = DEFAULT_PAGE_STAY_NAME.to_string();
        }
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn envelope_fields_deserialize_flat() {
        let log: ErrorLog = serde_json::from_value(json!({
            "timestamp": "2026-03-01T12:00:00Z",
            "project_id": "p1",
            "trace_id": "t-1",
            "type": "js_error",
            "message": "boom",
            "extra": { "stack": ["a", "b"] }
        }))
        .unwrap();

        assert_eq!(log.envelope.project_id, "p1");
        assert_eq!(log.envelope.trace_id, "t-1");
        assert_eq!(log.envelope.record_type, "js_error");
        assert_eq!(log.message, "boom");
        assert_eq!(
            log.envelope.extra,
            Extra::from_value(&json!({ "stack": ["a", "b"] }))
        );
        assert_eq!(
            log.envelope.timestamp,
            chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let metric: PerformanceMetric =
            serde_json::from_value(json!({ "project_id": "p1" })).unwrap();
        assert_eq!(metric.envelope.timestamp, ZERO_TIMESTAMP);
        assert_eq!(metric.envelope.record_type, "");
        assert!(metric.envelope.extra.is_null());
        assert_eq!(metric.value, 0.0);
    }

    #[test]
    fn null_timestamp_is_zero() {
        let stay: PageStay =
            serde_json::from_value(json!({ "timestamp": null, "value": 3.5 })).unwrap();
        assert_eq!(stay.envelope.timestamp, ZERO_TIMESTAMP);
        assert_eq!(stay.value, 3.5);
    }

    #[test]
    fn malformed_fields_are_rejected() {
        assert!(serde_json::from_value::<UserAction>(json!({ "status": -1 })).is_err());
        assert!(serde_json::from_value::<UserAction>(json!({ "status": 70000 })).is_err());
        assert!(serde_json::from_value::<ErrorLog>(json!({ "timestamp": "yesterday" })).is_err());
        assert!(serde_json::from_value::<ErrorLog>(json!(["not", "an", "object"])).is_err());
        assert!(serde_json::from_str::<PageStay>("[]").is_err());
        assert!(serde_json::from_str::<PageStay>("[null, \"p1\"]").is_err());
    }

    #[test]
    fn serializes_flat_with_type_key() {
        let action = UserAction {
            envelope: Envelope {
                project_id: "p1".into(),
                record_type: "user".into(),
                name: "click".into(),
                extra: Extra::empty_object(),
                ..Default::default()
            },
            method: "POST".into(),
            status: 201,
            value: 12.5,
            ..Default::default()
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "user");
        assert_eq!(value["name"], "click");
        assert_eq!(value["status"], 201);
        assert_eq!(value["method"], "POST");
        assert!(value.get("envelope").is_none());
    }

    #[test]
    fn extra_keeps_client_text() {
        let body = r#"{"project_id":"p1","extra":{"id":123456789012345678901234567890,"p":0.10000000000000000555,"z":1,"a":2}}"#;
        let log: ErrorLog = serde_json::from_str(body).unwrap();
        assert_eq!(
            log.envelope.extra.as_str(),
            r#"{"id":123456789012345678901234567890,"p":0.10000000000000000555,"z":1,"a":2}"#
        );

        let out = serde_json::to_string(&log).unwrap();
        assert!(out.contains(r#""extra":{"id":123456789012345678901234567890,"p":0.10000000000000000555,"z":1,"a":2}"#));
    }

    #[test]
    fn extra_from_json_validates() {
        assert_eq!(Extra::from_json(" [1, 2] ").unwrap().as_str(), "[1, 2]");
        assert!(Extra::from_json("{oops").is_err());
        assert!(Extra::from_json("1 2").is_err());
        assert!(Extra::default().is_null());
        assert!(!Extra::empty_object().is_null());
    }

    #[test]
    fn nul_characters_are_located() {
        let clean = UserAction {
            method: "GET".into(),
            ..Default::default()
        };
        assert_eq!(clean.nul_field(), None);

        let bad_method = UserAction {
            method: "G\0ET".into(),
            ..Default::default()
        };
        assert_eq!(bad_method.nul_field(), Some("method"));

        let bad_envelope = PageStay {
            envelope: Envelope {
                url: "https://a.example/\0".into(),
                ..Default::default()
            },
            value: 1.0,
        };
        assert_eq!(bad_envelope.nul_field(), Some("url"));

        let escaped_in_extra = ErrorLog {
            envelope: Envelope {
                extra: Extra::from_json(r#"{"k":"a\u0000b"}"#).unwrap(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(escaped_in_extra.nul_field(), None);
    }

    #[test]
    fn kind_tables_and_defaults() {
        assert_eq!(RecordKind::PageStay.table(), "page_stay");
        assert_eq!(RecordKind::ErrorLog.default_type(), "error");
        assert_eq!(RecordKind::ALL.len(), 5);
        assert_eq!(<CustomEvent as TelemetryRecord>::KIND, RecordKind::CustomEvent);
    }
}
