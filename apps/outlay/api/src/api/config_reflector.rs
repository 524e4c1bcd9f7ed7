//! `GET /config/all`: the flattened configuration as indented JSON.
//!
//! Values are returned unredacted, connection strings included.

use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_helpers::AppError;
use tracing::info;

pub const TAG: &str = "config";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/config/all", get(get_all_config))
        .with_state(state)
}

/// Dump all resolved configuration key/value pairs
#[utoipa::path(
    get,
    path = "/config/all",
    tag = TAG,
    responses(
        (status = 200, description = "Flattened configuration, keys sorted", body = Object),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn get_all_config(State(state): State<AppState>) -> Result<Response, AppError> {
    let pretty_json = state
        .config
        .snapshot()
        .to_pretty_json()
        .map_err(|e| AppError::InternalServerError(format!("Failed to render config: {}", e)))?;

    info!("App configuration:\n{}", pretty_json);

    Ok(([(header::CONTENT_TYPE, "application/json")], pretty_json).into_response())
}
