use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::auth::AuthUser;
use super::AppState;
use crate::components::calendar_store::{summarize, EventSummary, EventView, NewEvent};
use crate::error::Error;

/// The only message clients see when a suggestion fails
pub const SUGGESTION_FAILED: &str = "Failed to generate suggestion";

/// Body of a suggestion request
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub prompt: String,
}

fn suggestion_failed(status: StatusCode) -> Response {
    (status, Json(json!({ "error": SUGGESTION_FAILED }))).into_response()
}

/// Handler for natural-language event suggestions
pub async fn suggest_event_handler(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected suggestion request: {}", rejection.body_text());
            return suggestion_failed(StatusCode::BAD_REQUEST);
        }
    };

    if request.prompt.trim().is_empty() {
        warn!("Rejected suggestion request with an empty prompt");
        return suggestion_failed(StatusCode::BAD_REQUEST);
    }

    match state.suggestions.suggest_event(&request.prompt).await {
        Ok(draft) => Json(draft).into_response(),
        Err(e) => {
            error!("Error in AI suggestion: {}", e);
            suggestion_failed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Error returned from the event routes
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            Error::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Event not found".to_string()),
            other => {
                error!("Event request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Handler listing the signed-in user's events
pub async fn list_events_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = state.store.list_events(&user.id).await?;
    Ok(Json(events.into_iter().map(EventView::from).collect()))
}

/// Handler creating an event, typically from an edited suggestion
pub async fn create_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<EventView>), ApiError> {
    let Json(event) = payload?;
    let event = event.validated()?;
    let stored = state.store.create_event(&user.id, &event).await?;
    info!("Created event {} for user {}", stored.id, user.id);
    Ok((StatusCode::CREATED, Json(EventView::from(stored))))
}

/// Handler updating an existing event
pub async fn update_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Json<EventView>, ApiError> {
    let Json(event) = payload?;
    let event = event.validated()?;
    let stored = state.store.update_event(&user.id, &id, &event).await?;
    info!("Updated event {} for user {}", id, user.id);
    Ok(Json(EventView::from(stored)))
}

/// Handler deleting an event
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_event(&user.id, &id).await?;
    info!("Deleted event {} for user {}", id, user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for the dashboard statistics
pub async fn summary_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<EventSummary>, ApiError> {
    let events = state.store.list_events(&user.id).await?;
    Ok(Json(summarize(&events, Utc::now(), state.timezone)))
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
