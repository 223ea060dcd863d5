//! Range query contract shared by every read path.
//!
//! A query is scoped to one project and a closed time window
//! `[start, end]`, optionally narrowed to one `name` (the metric, action or
//! event name). Results are always ordered newest first and never paginated.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::CoreError;
use crate::telemetry::Envelope;
use crate::types::Timestamp;

/// Width of the window used when neither bound is supplied.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Raw query parameters as they arrive from a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeParams {
    pub project_id: Option<String>,
    /// RFC 3339 start of the window. Defaults to 24 hours before now.
    pub start_time: Option<String>,
    /// RFC 3339 end of the window. Defaults to now.
    pub end_time: Option<String>,
    /// Optional discriminator (metric, action or event name).
    pub name: Option<String>,
}

impl RangeParams {
    /// Validate the parameters and resolve the window against `now`.
    pub fn resolve(&self, now: Timestamp) -> Result<RangeFilter, CoreError> {
        let project_id = self.project_id.as_deref().unwrap_or_default();

        let start = match &self.start_time {
            Some(raw) => parse_rfc3339("start_time", raw)?,
            None => now - Duration::hours(DEFAULT_WINDOW_HOURS),
        };
        let end = match &self.end_time {
            Some(raw) => parse_rfc3339("end_time", raw)?,
            None => now,
        };

        let filter = RangeFilter::new(project_id, start, end)?;
        Ok(match self.name.as_deref() {
            Some(name) if !name.is_empty() => filter.with_name(name),
            _ => filter,
        })
    }
}

/// Parse a fully qualified RFC 3339 timestamp (offset required).
pub fn parse_rfc3339(field: &str, raw: &str) -> Result<Timestamp, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Validation(format!("Invalid {field} '{raw}': {e}")))
}

/// A validated, project-scoped window over one record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    project_id: String,
    start: Timestamp,
    end: Timestamp,
    name: Option<String>,
}

impl RangeFilter {
    /// Build a filter; an empty `project_id` is rejected.
    pub fn new(
        project_id: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Self, CoreError> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(CoreError::Validation("project_id is required".into()));
        }
        Ok(Self {
            project_id,
            start,
            end,
            name: None,
        })
    }

    /// Narrow the filter to records whose `name` equals `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Drop the `name` narrowing (aggregates ignore it).
    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a record envelope falls inside this filter. Both bounds are
    /// inclusive.
    pub fn matches(&self, envelope: &Envelope) -> bool {
        envelope.project_id == self.project_id
            && envelope.timestamp >= self.start
            && envelope.timestamp <= self.end
            && self
                .name
                .as_deref()
                .map_or(true, |name| envelope.name == name)
    }
}
