use std::sync::Arc;

use spectra_core::service::TelemetryService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Telemetry ingest and query service over the configured store.
    pub telemetry: TelemetryService,
    /// Server configuration (read by middleware and extractors).
    pub config: Arc<ServerConfig>,
}
