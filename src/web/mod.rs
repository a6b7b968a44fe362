use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use chrono_tz::Tz;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod handlers;

use crate::components::{CalendarStore, SuggestionService};
use auth::{require_auth, AuthService};
use handlers::{
    create_event_handler, delete_event_handler, health_handler, list_events_handler,
    suggest_event_handler, summary_handler, update_event_handler,
};

#[derive(Clone)]
pub struct AppState {
    /// Event suggestion pipeline
    pub suggestions: SuggestionService,
    /// Event storage
    pub store: Arc<dyn CalendarStore>,
    /// Access token verification
    pub auth_service: Arc<AuthService>,
    /// Timezone for dashboard statistics
    pub timezone: Tz,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Event routes need a signed-in user
    let events = Router::new()
        .route("/api/events", get(list_events_handler).post(create_event_handler))
        .route("/api/events/summary", get(summary_handler))
        .route(
            "/api/events/{id}",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/ai/suggest-event", post(suggest_event_handler))
        .merge(events)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
