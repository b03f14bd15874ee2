//! In-memory event store with conflict detection.
//!
//! The store is the single source of truth for events. Every operation runs
//! to completion against the map before returning, and a failed create or
//! update leaves the map untouched. Callers that share a store between
//! threads wrap it in a lock and hold it for the whole operation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CalendarError, CalendarResult};
use crate::event::{AnnotatedEvent, Event, EventInput};
use crate::time_range::{TimeRange, parse_timezone};

/// What the store does when a new or updated event overlaps existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Store it anyway; overlaps are reported through `conflicts_of`.
    #[default]
    Allow,
    /// Refuse it with `CalendarError::Conflict`.
    Reject,
}

#[derive(Debug, Default)]
pub struct EventStore {
    events: HashMap<String, Event>,
    policy: ConflictPolicy,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConflictPolicy) -> Self {
        EventStore {
            events: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    /// Validate `input` and insert it under a freshly generated id.
    pub fn create(&mut self, input: EventInput) -> CalendarResult<Event> {
        let event = validate(Uuid::new_v4().to_string(), input)?;
        self.enforce_policy(&event.time_range, None)?;

        debug!(id = %event.id, title = %event.title, "created event");
        self.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    /// Replace the event at `id`, keeping the id.
    pub fn update(&mut self, id: &str, input: EventInput) -> CalendarResult<Event> {
        if !self.events.contains_key(id) {
            return Err(CalendarError::NotFound(id.to_string()));
        }

        let event = validate(id.to_string(), input)?;
        self.enforce_policy(&event.time_range, Some(id))?;

        debug!(id = %event.id, title = %event.title, "updated event");
        self.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    /// Remove the event at `id`. Deleting a missing id is `NotFound`.
    pub fn delete(&mut self, id: &str) -> CalendarResult<()> {
        match self.events.remove(id) {
            Some(_) => {
                debug!(id, "deleted event");
                Ok(())
            }
            None => Err(CalendarError::NotFound(id.to_string())),
        }
    }

    pub fn get(&self, id: &str) -> CalendarResult<Event> {
        self.events
            .get(id)
            .cloned()
            .ok_or_else(|| CalendarError::NotFound(id.to_string()))
    }

    /// All events, ordered by start, then end, then id.
    pub fn list(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.values().cloned().collect();
        sort_chronologically(&mut events);
        events
    }

    /// Every other event whose range overlaps the event at `id`.
    pub fn conflicts_of(&self, id: &str) -> CalendarResult<Vec<Event>> {
        let event = self
            .events
            .get(id)
            .ok_or_else(|| CalendarError::NotFound(id.to_string()))?;

        Ok(self.overlapping(&event.time_range, Some(id)))
    }

    /// Every event paired with the ids of the events it overlaps.
    ///
    /// Sorted by start, so each event only has to be compared with the
    /// events that start before it ends.
    pub fn annotated(&self) -> Vec<AnnotatedEvent> {
        let events = self.list();
        let mut conflicts: Vec<Vec<String>> = vec![Vec::new(); events.len()];

        for (i, event) in events.iter().enumerate() {
            for (j, other) in events.iter().enumerate().skip(i + 1) {
                if other.time_range.start() >= event.time_range.end() {
                    break;
                }
                conflicts[i].push(other.id.clone());
                conflicts[j].push(event.id.clone());
            }
        }

        events
            .into_iter()
            .zip(conflicts)
            .map(|(event, conflicts)| AnnotatedEvent { event, conflicts })
            .collect()
    }

    fn overlapping(&self, range: &TimeRange, exclude: Option<&str>) -> Vec<Event> {
        let mut overlapping: Vec<Event> = self
            .events
            .values()
            .filter(|e| Some(e.id.as_str()) != exclude)
            .filter(|e| e.time_range.overlaps(range))
            .cloned()
            .collect();
        sort_chronologically(&mut overlapping);
        overlapping
    }

    fn enforce_policy(&self, range: &TimeRange, exclude: Option<&str>) -> CalendarResult<()> {
        if self.policy == ConflictPolicy::Allow {
            return Ok(());
        }

        let conflicts = self.overlapping(range, exclude);
        if conflicts.is_empty() {
            Ok(())
        } else {
            debug!(count = conflicts.len(), "rejected overlapping event");
            Err(CalendarError::Conflict { conflicts })
        }
    }
}

fn validate(id: String, input: EventInput) -> CalendarResult<Event> {
    if input.title.trim().is_empty() {
        return Err(CalendarError::Validation("Title must not be empty".to_string()));
    }

    let tz = parse_timezone(&input.timezone)?;
    let time_range = TimeRange::parse_in(&input.start, &input.end, tz)?;

    Ok(Event {
        id,
        title: input.title,
        description: input.description.unwrap_or_default(),
        time_range,
        timezone: tz.name().to_string(),
    })
}

fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.time_range
            .start()
            .cmp(&b.time_range.start())
            .then_with(|| a.time_range.end().cmp(&b.time_range.end()))
            .then_with(|| a.id.cmp(&b.id))
    });
}
