//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the standard [`ErrorResponse`](crate::ErrorResponse)
//! body so handlers never see malformed input.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
