pub mod events;
pub mod health;

use anyhow::Context;
use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use weekcal_core::{CalendarError, Event};

use crate::state::AppState;

/// Build the API router with CORS and request tracing.
pub fn build_router(state: AppState, cors_origins: &[String]) -> anyhow::Result<Router> {
    Ok(Router::new()
        .merge(events::router())
        .merge(health::router())
        .with_state(state)
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Event>>,
}

/// Convert errors to HTTP responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, conflicts) = match self.0.downcast_ref::<CalendarError>() {
            Some(CalendarError::Validation(_) | CalendarError::InvalidTimeRange(_)) => {
                (StatusCode::BAD_REQUEST, None)
            }
            Some(CalendarError::NotFound(_)) => (StatusCode::NOT_FOUND, None),
            Some(CalendarError::Conflict { conflicts }) => {
                (StatusCode::CONFLICT, Some(conflicts.clone()))
            }
            None => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            conflicts,
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
