//! Event endpoints

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use weekcal_core::{AnnotatedEvent, CalendarError, Event, EventInput};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/annotated", get(list_annotated))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/{id}/conflicts", get(list_conflicts))
}

/// Request body for creating or updating an event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timezone: Option<String>,
}

impl EventRequest {
    fn into_input(self, default_timezone: &str) -> Result<EventInput, CalendarError> {
        let title = required(self.title, "title")?;
        let start = required(self.start_time, "startTime")?;
        let end = required(self.end_time, "endTime")?;
        let timezone = self
            .timezone
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| default_timezone.to_string());

        let mut input = EventInput::new(title, start, end).with_timezone(timezone);
        input.description = self.description;
        Ok(input)
    }
}

/// Decode a JSON body. Unreadable bodies are reported like any other
/// invalid field so every error reply keeps the same shape.
fn parse_body(body: &Bytes) -> Result<EventRequest, CalendarError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CalendarError::Validation("No data provided".to_string()));
    }

    Json::<EventRequest>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| {
            CalendarError::Validation(format!("Invalid request body: {}", rejection.body_text()))
        })
}

fn required(value: Option<String>, field: &str) -> Result<String, CalendarError> {
    value.ok_or_else(|| CalendarError::Validation(format!("Missing field: {field}")))
}

/// GET /api/events - List all events, earliest first
async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.store.read().await.list())
}

/// GET /api/events/annotated - List all events with the ids they overlap
async fn list_annotated(State(state): State<AppState>) -> Json<Vec<AnnotatedEvent>> {
    Json(state.store.read().await.annotated())
}

/// GET /api/events/:id - Fetch one event
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.store.read().await.get(&id)?))
}

/// GET /api/events/:id/conflicts - Events overlapping the given one
async fn list_conflicts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.store.read().await.conflicts_of(&id)?))
}

/// POST /api/events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let input = parse_body(&body)?.into_input(&state.default_timezone)?;
    let event = state.store.write().await.create(input)?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/:id - Replace an existing event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Event>, AppError> {
    let mut store = state.store.write().await;

    // An unknown id is reported before any problem with the body
    if !store.contains(&id) {
        return Err(CalendarError::NotFound(id).into());
    }

    let input = parse_body(&body)?.into_input(&state.default_timezone)?;
    Ok(Json(store.update(&id, input)?))
}

/// DELETE /api/events/:id - Delete an event
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.write().await.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
