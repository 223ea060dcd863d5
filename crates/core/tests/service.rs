//! Service-level tests against the in-memory store.
//!
//! Covers ingest normalization, round-trips for every record kind, ordering,
//! name filtering, the page stay average and cancellation.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use spectra_core::context::CallContext;
use spectra_core::error::CoreError;
use spectra_core::query::{RangeFilter, RangeParams};
use spectra_core::service::TelemetryService;
use spectra_core::store::MemoryTelemetryStore;
use spectra_core::telemetry::{
    CustomEvent, Envelope, ErrorLog, Extra, PageStay, PerformanceMetric, UserAction,
};
use spectra_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> (Arc<MemoryTelemetryStore>, TelemetryService) {
    let store = Arc::new(MemoryTelemetryStore::new());
    let service = TelemetryService::new(store.clone());
    (store, service)
}

fn ts(minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 4, 20, 15, minute, 0).unwrap()
}

fn envelope(project: &str, timestamp: Timestamp) -> Envelope {
    Envelope {
        project_id: project.into(),
        timestamp,
        session_id: "s-1".into(),
        user_id: "u-1".into(),
        url: "https://app.example.com/checkout".into(),
        referrer: "https://app.example.com/cart".into(),
        ..Default::default()
    }
}

/// Window of one second either side of `at`.
fn around(project: &str, at: Timestamp) -> RangeFilter {
    RangeFilter::new(project, at - Duration::seconds(1), at + Duration::seconds(1)).unwrap()
}

fn metric(name: &str, minute: u32, value: f64) -> PerformanceMetric {
    PerformanceMetric {
        envelope: Envelope {
            name: name.into(),
            ..envelope("web", ts(minute))
        },
        value,
    }
}

// ---------------------------------------------------------------------------
// Ingest + round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_log_trace_lookup_scenario() {
    let (_, service) = setup();
    let ctx = CallContext::new();

    let log = ErrorLog {
        envelope: Envelope {
            trace_id: "t-1".into(),
            ..envelope("web", ts(0))
        },
        message: "TypeError: x is undefined".into(),
    };
    let stored = service.record_error_log(&ctx, log).await.unwrap();
    assert_eq!(stored.envelope.record_type, "error");

    let found = service.error_log_by_trace_id(&ctx, "t-1").await.unwrap();
    assert_eq!(found, Some(stored));

    let missing = service.error_log_by_trace_id(&ctx, "t-missing").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn every_kind_round_trips_with_extra() {
    let (_, service) = setup();
    let ctx = CallContext::new();
    let extra = Extra::from_json(
        r#"{"browser":"firefox","tags":["a","b"],"depth":{"n":1.5,"big":123456789012345678901234567890}}"#,
    )
    .unwrap();

    let log = service
        .record_error_log(
            &ctx,
            ErrorLog {
                envelope: Envelope {
                    extra: extra.clone(),
                    ..envelope("rt", ts(1))
                },
                message: "boom".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        service.list_error_logs(&ctx, &around("rt", ts(1))).await.unwrap(),
        vec![log]
    );

    let metric = service
        .record_performance_metric(&ctx, metric("LCP", 2, 1234.5))
        .await
        .unwrap();
    assert_eq!(
        service
            .list_performance_metrics(&ctx, &around("web", ts(2)))
            .await
            .unwrap(),
        vec![metric]
    );

    let action = service
        .record_user_action(
            &ctx,
            UserAction {
                envelope: Envelope {
                    name: "fetch".into(),
                    extra: extra.clone(),
                    ..envelope("rt", ts(3))
                },
                message: "GET /api/cart".into(),
                method: "GET".into(),
                status: 404,
                value: 87.25,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        service.list_user_actions(&ctx, &around("rt", ts(3))).await.unwrap(),
        vec![action]
    );

    let event = service
        .record_custom_event(
            &ctx,
            CustomEvent {
                envelope: envelope("rt", ts(4)),
                message: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(event.message, "custom_event");
    assert_eq!(event.envelope.record_type, "custom");
    assert_eq!(
        service.list_custom_events(&ctx, &around("rt", ts(4))).await.unwrap(),
        vec![event]
    );

    let stay = service
        .record_page_stay(
            &ctx,
            PageStay {
                envelope: envelope("rt", ts(5)),
                value: 42.0,
            },
        )
        .await
        .unwrap();
    assert_eq!(stay.envelope.name, "page_stay_time");
    assert_eq!(
        service.list_page_stays(&ctx, &around("rt", ts(5))).await.unwrap(),
        vec![stay]
    );
}

#[tokio::test]
async fn missing_timestamp_is_filled_with_ingest_time() {
    let (_, service) = setup();
    let ctx = CallContext::new();

    let before = Utc::now() - Duration::seconds(1);
    let stored = service
        .record_page_stay(
            &ctx,
            PageStay {
                envelope: Envelope {
                    project_id: "web".into(),
                    ..Default::default()
                },
                value: 3.0,
            },
        )
        .await
        .unwrap();
    let after = Utc::now() + Duration::seconds(1);

    assert!(stored.envelope.timestamp >= before && stored.envelope.timestamp <= after);
    assert_eq!(stored.envelope.extra, Extra::empty_object());
}

// ---------------------------------------------------------------------------
// Query contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn results_are_newest_first() {
    let (_, service) = setup();
    let ctx = CallContext::new();

    for minute in [10, 30, 20] {
        service
            .record_performance_metric(&ctx, metric("TTFB", minute, f64::from(minute)))
            .await
            .unwrap();
    }

    let filter = RangeFilter::new("web", ts(0), ts(59)).unwrap();
    let values: Vec<f64> = service
        .list_performance_metrics(&ctx, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.value)
        .collect();
    assert_eq!(values, vec![30.0, 20.0, 10.0]);
}

#[tokio::test]
async fn name_filter_selects_one_metric() {
    let (_, service) = setup();
    let ctx = CallContext::new();

    for (minute, value) in [(1, 1200.0), (2, 800.0), (3, 1500.0)] {
        service
            .record_performance_metric(&ctx, metric("LCP", minute, value))
            .await
            .unwrap();
    }
    service
        .record_performance_metric(&ctx, metric("CLS", 4, 0.12))
        .await
        .unwrap();

    let filter = RangeFilter::new("web", ts(0), ts(59))
        .unwrap()
        .with_name("LCP");
    let lcp = service.list_performance_metrics(&ctx, &filter).await.unwrap();

    let values: Vec<f64> = lcp.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![1500.0, 800.0, 1200.0]);
    assert!(lcp.iter().all(|m| m.envelope.name == "LCP"));
}

#[tokio::test]
async fn empty_window_returns_empty_list() {
    let (_, service) = setup();
    let ctx = CallContext::new();
    service
        .record_performance_metric(&ctx, metric("LCP", 1, 1.0))
        .await
        .unwrap();

    let filter = RangeFilter::new("web", ts(30), ts(40)).unwrap();
    assert!(service
        .list_performance_metrics(&ctx, &filter)
        .await
        .unwrap()
        .is_empty());

    let other_project = RangeFilter::new("mobile", ts(0), ts(59)).unwrap();
    assert!(service
        .list_performance_metrics(&ctx, &other_project)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn average_page_stay_semantics() {
    let (_, service) = setup();
    let ctx = CallContext::new();
    let window = RangeFilter::new("web", ts(0), ts(59)).unwrap();

    assert_eq!(service.average_page_stay(&ctx, &window).await.unwrap(), 0.0);

    for (minute, value) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
        service
            .record_page_stay(
                &ctx,
                PageStay {
                    envelope: envelope("web", ts(minute)),
                    value,
                },
            )
            .await
            .unwrap();
    }
    assert_eq!(service.average_page_stay(&ctx, &window).await.unwrap(), 20.0);
}

#[tokio::test]
async fn missing_project_id_never_reaches_the_store() {
    let (store, _) = setup();

    let params = RangeParams {
        start_time: Some("2026-04-20T00:00:00Z".into()),
        ..Default::default()
    };
    assert_matches!(params.resolve(Utc::now()), Err(CoreError::Validation(_)));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn empty_trace_id_is_rejected() {
    let (store, service) = setup();
    let result = service.error_log_by_trace_id(&CallContext::new(), "").await;
    assert_matches!(result, Err(CoreError::Validation(_)));
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn nul_characters_never_reach_the_store() {
    let (store, service) = setup();
    let ctx = CallContext::new();

    let result = service
        .record_error_log(
            &ctx,
            ErrorLog {
                envelope: envelope("web", ts(1)),
                message: "a\0b".into(),
            },
        )
        .await;
    assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("message"));

    let result = service
        .record_custom_event(
            &ctx,
            CustomEvent {
                envelope: Envelope {
                    trace_id: "t\0".into(),
                    ..envelope("web", ts(1))
                },
                message: "signup".into(),
            },
        )
        .await;
    assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("trace_id"));

    assert_eq!(store.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn canceled_context_reports_canceled() {
    let (_, service) = setup();
    let ctx = CallContext::new();
    ctx.token().cancel();

    let result = service
        .record_error_log(&ctx, ErrorLog::default())
        .await;
    assert_matches!(result, Err(CoreError::Canceled(_)));

    let filter = RangeFilter::new("web", ts(0), ts(59)).unwrap();
    let result = service.average_page_stay(&ctx, &filter).await;
    assert_matches!(result, Err(CoreError::Canceled(_)));
}
