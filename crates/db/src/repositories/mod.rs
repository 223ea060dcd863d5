//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Rows decode straight into the
//! `spectra_core::telemetry` record types.

pub mod custom_event_repo;
pub mod envelope;
pub mod error_log_repo;
pub mod page_stay_repo;
pub mod performance_metric_repo;
pub mod user_action_repo;

pub use custom_event_repo::CustomEventRepo;
pub use error_log_repo::ErrorLogRepo;
pub use page_stay_repo::PageStayRepo;
pub use performance_metric_repo::PerformanceMetricRepo;
pub use user_action_repo::UserActionRepo;
