#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use spectra_api::config::ServerConfig;
use spectra_api::router::build_app_router;
use spectra_api::state::AppState;
use spectra_core::query::RangeFilter;
use spectra_core::service::TelemetryService;
use spectra_core::store::{MemoryTelemetryStore, StoreError, TelemetryStore};
use spectra_core::telemetry::{CustomEvent, ErrorLog, PageStay, PerformanceMetric, UserAction};

/// Build a test `ServerConfig` with safe defaults.
///
/// Any CORS origin, a 30-second request timeout and a 1-second store
/// deadline so stalled-store tests finish quickly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        store_timeout_secs: 1,
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack production uses.
pub fn build_test_app(store: Arc<dyn TelemetryStore>) -> Router {
    let config = test_config();
    let state = AppState {
        telemetry: TelemetryService::new(store),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Router over a fresh in-memory store, plus the store for call counting.
pub fn memory_app() -> (Router, Arc<MemoryTelemetryStore>) {
    let store = Arc::new(MemoryTelemetryStore::new());
    (build_test_app(store.clone()), store)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Raw response body, for payloads whose exact digits matter.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A store whose every call either fails or never completes.
pub enum BrokenStore {
    Failing,
    Stalled,
}

impl BrokenStore {
    async fn outcome<T>(&self) -> Result<T, StoreError> {
        match self {
            BrokenStore::Failing => Err(StoreError::backend(
                "connection refused: password=hunter2",
            )),
            BrokenStore::Stalled => std::future::pending().await,
        }
    }
}

#[async_trait]
impl TelemetryStore for BrokenStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn save_error_log(&self, _log: &ErrorLog) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn query_error_logs(&self, _filter: &RangeFilter) -> Result<Vec<ErrorLog>, StoreError> {
        self.outcome().await
    }

    async fn find_error_log_by_trace_id(
        &self,
        _trace_id: &str,
    ) -> Result<Option<ErrorLog>, StoreError> {
        self.outcome().await
    }

    async fn save_performance_metric(&self, _m: &PerformanceMetric) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn query_performance_metrics(
        &self,
        _filter: &RangeFilter,
    ) -> Result<Vec<PerformanceMetric>, StoreError> {
        self.outcome().await
    }

    async fn save_user_action(&self, _action: &UserAction) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn query_user_actions(
        &self,
        _filter: &RangeFilter,
    ) -> Result<Vec<UserAction>, StoreError> {
        self.outcome().await
    }

    async fn save_custom_event(&self, _event: &CustomEvent) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn query_custom_events(
        &self,
        _filter: &RangeFilter,
    ) -> Result<Vec<CustomEvent>, StoreError> {
        self.outcome().await
    }

    async fn save_page_stay(&self, _stay: &PageStay) -> Result<(), StoreError> {
        self.outcome().await
    }

    async fn query_page_stays(&self, _filter: &RangeFilter) -> Result<Vec<PageStay>, StoreError> {
        self.outcome().await
    }

    async fn average_page_stay(&self, _filter: &RangeFilter) -> Result<f64, StoreError> {
        self.outcome().await
    }
}
