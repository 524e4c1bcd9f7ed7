//! # Axum Helpers
//!
//! Shared HTTP plumbing for the workspace's Axum services.
//!
//! - **[`server`]**: router bootstrap with OpenAPI docs, health checks, graceful shutdown
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: validated JSON bodies and integer path ids
//! - **[`envelope`]**: the `{success, message, result}` service response wrapper

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod server;

pub use envelope::{FailureKind, ServiceResponse};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, ValidatedJson};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
