use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("No Event Hub configured for event '{0}'")]
    RouteNotFound(String),

    #[error("Message of {size} bytes does not fit in an outbound batch (limit {limit} bytes)")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("Invalid event route configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<redis::RedisError> for EventError {
    fn from(err: redis::RedisError) -> Self {
        EventError::Transport(err.to_string())
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::RouteNotFound(_) => AppError::NotFound(err.to_string()),
            EventError::MessageTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            EventError::Transport(_) => AppError::MessagingError(err.to_string()),
            EventError::InvalidConfig(_) | EventError::Serialization(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
