//! Calendar event types.

use serde::Serialize;

use crate::time_range::TimeRange;

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// A stored calendar event.
///
/// Instances are owned by the `EventStore`; callers get clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub time_range: TimeRange,
    /// IANA zone the wall-clock input was given in. Display only.
    pub timezone: String,
}

/// Unvalidated fields for creating or updating an event.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    pub timezone: String,
}

impl EventInput {
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        EventInput {
            title: title.into(),
            description: None,
            start: start.into(),
            end: end.into(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }
}

/// An event together with the ids of every event it overlaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub conflicts: Vec<String>,
}
