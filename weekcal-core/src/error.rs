//! Error types for weekcal.

use thiserror::Error;

use crate::event::Event;

/// Errors that can occur in event store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    /// Only produced under `ConflictPolicy::Reject`.
    #[error("Event conflicts with {} existing event(s)", .conflicts.len())]
    Conflict { conflicts: Vec<Event> },
}

/// Result type alias for event store operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
