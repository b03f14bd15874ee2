//! Core types for weekcal.
//!
//! This crate holds everything with real invariants in the calendar:
//! - `TimeRange`, a timezone-normalized half-open interval with overlap checks
//! - `Event`, the stored calendar entry
//! - `EventStore`, the in-memory source of truth with conflict queries

pub mod error;
pub mod event;
pub mod store;
pub mod time_range;

pub use error::{CalendarError, CalendarResult};
pub use event::{AnnotatedEvent, Event, EventInput};
pub use store::{ConflictPolicy, EventStore};
pub use time_range::TimeRange;
