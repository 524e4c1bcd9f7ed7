//! Uniform `{success, message, result}` wrapper returned by service operations.
//!
//! Expected failures (missing records, conflicts) are data, not errors: a
//! service returns `ServiceResponse::failure(..)` and the handler maps the
//! attached [`FailureKind`] onto an HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Why an operation failed. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Conflict,
    Internal,
}

impl FailureKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::Conflict => StatusCode::CONFLICT,
            FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl<T> ServiceResponse<T> {
    pub fn success(message: impl Into<String>, result: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            result: Some(result),
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            result: None,
            failure: Some(kind),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::Internal, message)
    }

    /// 200 on success, otherwise the status of the failure kind.
    /// A failed envelope without a kind is treated as internal.
    pub fn status_code(&self) -> StatusCode {
        if self.success {
            StatusCode::OK
        } else {
            self.failure
                .unwrap_or(FailureKind::Internal)
                .status_code()
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResponse<U> {
        ServiceResponse {
            success: self.success,
            message: self.message,
            result: self.result.map(f),
            failure: self.failure,
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
