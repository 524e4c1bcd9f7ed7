use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{InternalServerErrorResponse, NotFoundResponse, PayloadTooLargeResponse},
    AppError,
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventError;
use crate::forwarder::EventForwarder;
use crate::models::SendStatus;

pub const TAG: &str = "events";

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(send_to_route, send_default),
    components(
        schemas(SendStatus),
        responses(NotFoundResponse, PayloadTooLargeResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Outbound event forwarding")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
struct EventsState {
    forwarder: Arc<dyn EventForwarder>,
    default_event_name: Arc<str>,
}

/// Create the events router
///
/// `default_event_name` is the event `POST /events/send` forwards under.
pub fn router(forwarder: Arc<dyn EventForwarder>, default_event_name: impl Into<String>) -> Router {
    let state = EventsState {
        forwarder,
        default_event_name: Arc::from(default_event_name.into()),
    };

    Router::new()
        .route("/eventhub/{event_name}/send", post(send_to_route))
        .route("/events/send", post(send_default))
        .with_state(state)
}

async fn forward(
    forwarder: &dyn EventForwarder,
    event_name: &str,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(), AppError> {
    let Json(payload) = payload?;
    let message = serde_json::to_string(&payload).map_err(EventError::from)?;

    forwarder.send(event_name, &message).await?;
    Ok(())
}

/// Forward a JSON payload under the given event name
#[utoipa::path(
    post,
    path = "/eventhub/{event_name}/send",
    tag = TAG,
    params(
        ("event_name" = String, Path, description = "Configured event name")
    ),
    request_body(content = Object, description = "Arbitrary JSON payload"),
    responses(
        (status = 200, description = "Message handed to the destination", body = SendStatus),
        (status = 400, description = "Body is not valid JSON"),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_to_route(
    State(state): State<EventsState>,
    Path(event_name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SendStatus>, AppError> {
    forward(state.forwarder.as_ref(), &event_name, payload).await?;
    Ok(Json(SendStatus::routed(&event_name)))
}

/// Forward a JSON payload under the default event name
#[utoipa::path(
    post,
    path = "/events/send",
    tag = TAG,
    request_body(content = Object, description = "Arbitrary JSON payload"),
    responses(
        (status = 200, description = "Message handed to the destination", body = SendStatus),
        (status = 400, description = "Body is not valid JSON"),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_default(
    State(state): State<EventsState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SendStatus>, AppError> {
    forward(state.forwarder.as_ref(), &state.default_event_name, payload).await?;
    Ok(Json(SendStatus::default_route()))
}
