//! Shared application state passed to the app-level handlers.

use domain_events::EventForwarder;
use std::sync::Arc;

/// Cloned per handler; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Routed or no-op forwarder, chosen once at startup
    pub events: Arc<dyn EventForwarder>,
}
