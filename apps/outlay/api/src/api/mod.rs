use axum::{routing::get, Router};

pub mod config_reflector;
pub mod events;
pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest(domain_users::entity::Model::URL, users::router(state))
        .merge(events::router(state))
        .merge(config_reflector::router(state.clone()))
}

/// Creates a router with the /ready endpoint that checks the database.
///
/// Has state applied and can be merged with the stateless app router from
/// `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{Config, Environment};
    use crate::state::AppState;
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use domain_events::{EventRouteConfig, NoOpEventForwarder};
    use sea_orm::{DatabaseBackend, DatabaseConnection};
    use std::sync::Arc;

    pub fn config() -> Config {
        Config {
            app: app_info!(),
            database: PostgresConfig::new("postgresql://outlay@localhost/outlay"),
            server: ServerConfig::default(),
            events: EventRouteConfig::default(),
            environment: Environment::Development,
            run_migrations: false,
        }
    }

    pub fn state_with(db: DatabaseConnection) -> AppState {
        AppState {
            config: config(),
            db,
            events: Arc::new(NoOpEventForwarder),
        }
    }

    pub fn state() -> AppState {
        state_with(sea_orm::MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }
}
