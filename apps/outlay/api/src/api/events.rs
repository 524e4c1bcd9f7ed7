use axum::Router;
use domain_events::handlers;
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(
        Arc::clone(&state.events),
        state.config.events.default_event_name.clone(),
    )
}
