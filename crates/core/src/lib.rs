//! Spectra core domain.
//!
//! Record model, default-value normalization, the range query contract and
//! the [`store::TelemetryStore`] seam that storage backends implement.

pub mod context;
pub mod error;
pub mod normalize;
pub mod query;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;
