use core_config::{app_info, env_bool_or, server::ServerConfig, AppInfo, ConfigSnapshot, FromEnv};
use database::postgres::PostgresConfig;
use domain_events::EventRouteConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub events: EventRouteConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if DATABASE_URL is not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let events = EventRouteConfig::from_env()?; // Route problems select the no-op forwarder
        let run_migrations = env_bool_or("RUN_MIGRATIONS", true)?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            events,
            environment,
            run_migrations,
        })
    }

    /// Every non-empty environment variable, overlaid with the resolved
    /// settings as `section:key` entries.
    pub fn snapshot(&self) -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::from_env();
        self.reflect(&mut snapshot);
        snapshot
    }

    pub fn reflect(&self, snapshot: &mut ConfigSnapshot) {
        snapshot.insert("app:name", self.app.name);
        snapshot.insert("app:version", self.app.version);
        snapshot.insert("app:environment", self.environment.as_str());
        snapshot.insert("app:run_migrations", self.run_migrations);
        self.server.reflect(snapshot);
        self.database.reflect(snapshot);
        self.events.reflect(snapshot);
    }
}
