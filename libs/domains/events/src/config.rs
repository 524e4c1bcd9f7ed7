//! Event route configuration.
//!
//! Routes come from one of two sources, in priority order:
//!
//! 1. Structured variables `EVENT_ROUTES__<n>__EVENT_NAME`,
//!    `EVENT_ROUTES__<n>__DESTINATION_CONNECTION` and
//!    `EVENT_ROUTES__<n>__DESTINATION_CHANNEL`, ordered by `<n>`.
//! 2. `EVENT_ROUTES_JSON`, shaped like
//!    `{"routes":[{"eventName":..,"destinationConnection":..,"destinationChannel":..}]}`.
//!
//! A missing or malformed source is not a startup error; it selects the
//! no-op forwarder instead.

use core_config::{ConfigError, ConfigSnapshot, FromEnv};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{EventError, EventResult};
use crate::models::{EventRouteOptions, RouteEntry};

pub const STRUCTURED_PREFIX: &str = "EVENT_ROUTES__";
pub const JSON_VAR: &str = "EVENT_ROUTES_JSON";

pub const DEFAULT_EVENT_NAME: &str = "OutlayEvent";
pub const DEFAULT_MAX_BATCH_BYTES: usize = 1_048_576;
pub const DEFAULT_STREAM_MAX_LEN: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteSource {
    Structured,
    Json,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Structured => "structured",
            RouteSource::Json => "json",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteSettings {
    /// Neither source is present
    Missing,
    /// Entries in configuration order
    Loaded {
        source: RouteSource,
        routes: Vec<RouteEntry>,
    },
    /// A source is present but unreadable
    Malformed { source: RouteSource, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRouteConfig {
    pub routes: RouteSettings,
    /// Event name used by `POST /events/send`
    pub default_event_name: String,
    pub max_batch_bytes: usize,
    /// Approximate `MAXLEN` applied to every destination stream
    pub stream_max_len: usize,
}

impl Default for EventRouteConfig {
    fn default() -> Self {
        Self {
            routes: RouteSettings::Missing,
            default_event_name: DEFAULT_EVENT_NAME.to_string(),
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            stream_max_len: DEFAULT_STREAM_MAX_LEN,
        }
    }
}

impl EventRouteConfig {
    /// Builds the configuration from raw key/value pairs.
    ///
    /// Only the scalar settings can fail; route problems are recorded in
    /// [`RouteSettings`].
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let default_event_name = vars
            .get("EVENT_DEFAULT_NAME")
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_EVENT_NAME)
            .to_string();

        let max_batch_bytes = parse_or(&vars, "EVENT_MAX_BATCH_BYTES", DEFAULT_MAX_BATCH_BYTES)?;
        let stream_max_len = parse_or(&vars, "EVENT_STREAM_MAX_LEN", DEFAULT_STREAM_MAX_LEN)?;

        Ok(Self {
            routes: load_routes(&vars),
            default_event_name,
            max_batch_bytes,
            stream_max_len,
        })
    }

    /// Routes ready to build a route table from, or why there are none.
    pub fn resolve_routes(&self) -> EventResult<&[RouteEntry]> {
        let routes = match &self.routes {
            RouteSettings::Missing => {
                return Err(EventError::InvalidConfig(
                    "no event routes configured".to_string(),
                ));
            }
            RouteSettings::Malformed { source, reason } => {
                return Err(EventError::InvalidConfig(format!(
                    "{} route source: {}",
                    source.as_str(),
                    reason
                )));
            }
            RouteSettings::Loaded { routes, .. } => routes,
        };

        if routes.is_empty() {
            return Err(EventError::InvalidConfig(
                "event route list is empty".to_string(),
            ));
        }

        for (index, route) in routes.iter().enumerate() {
            if let Some(field) = route.blank_field() {
                return Err(EventError::InvalidConfig(format!(
                    "route {} has a blank {}",
                    index, field
                )));
            }
        }

        Ok(routes)
    }

    pub fn reflect(&self, snapshot: &mut ConfigSnapshot) {
        if let RouteSettings::Loaded { routes, .. } = &self.routes {
            for (index, route) in routes.iter().enumerate() {
                let prefix = format!("events:routes:{}", index);
                snapshot.insert(format!("{prefix}:event_name"), &route.event_name);
                snapshot.insert(
                    format!("{prefix}:destination_connection"),
                    &route.destination_connection,
                );
                snapshot.insert(
                    format!("{prefix}:destination_channel"),
                    &route.destination_channel,
                );
            }
        }
        snapshot.insert("events:default_event_name", &self.default_event_name);
        snapshot.insert("events:max_batch_bytes", self.max_batch_bytes);
        snapshot.insert("events:stream_max_len", self.stream_max_len);
    }
}

impl FromEnv for EventRouteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(core_config::env_vars())
    }
}

fn parse_or<T>(vars: &BTreeMap<String, String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn load_routes(vars: &BTreeMap<String, String>) -> RouteSettings {
    let structured: Vec<(&str, &str)> = vars
        .iter()
        .filter_map(|(k, v)| k.strip_prefix(STRUCTURED_PREFIX).map(|rest| (rest, v.as_str())))
        .collect();

    if !structured.is_empty() {
        return match load_structured(&structured) {
            Ok(routes) => RouteSettings::Loaded {
                source: RouteSource::Structured,
                routes,
            },
            Err(reason) => RouteSettings::Malformed {
                source: RouteSource::Structured,
                reason,
            },
        };
    }

    match vars.get(JSON_VAR).filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => match serde_json::from_str::<EventRouteOptions>(raw) {
            Ok(options) => RouteSettings::Loaded {
                source: RouteSource::Json,
                routes: options.routes,
            },
            Err(e) => RouteSettings::Malformed {
                source: RouteSource::Json,
                reason: e.to_string(),
            },
        },
        None => RouteSettings::Missing,
    }
}

/// `rest` is the key with the prefix removed, e.g. `0__EVENT_NAME`.
fn load_structured(pairs: &[(&str, &str)]) -> Result<Vec<RouteEntry>, String> {
    let mut by_index: BTreeMap<usize, RouteEntry> = BTreeMap::new();

    for (rest, value) in pairs {
        let (index, field) = rest
            .split_once("__")
            .ok_or_else(|| format!("unrecognized key '{}{}'", STRUCTURED_PREFIX, rest))?;
        let index: usize = index
            .parse()
            .map_err(|_| format!("route index '{}' is not a number", index))?;

        let entry = by_index.entry(index).or_default();
        match field.to_ascii_uppercase().as_str() {
            "EVENT_NAME" => entry.event_name = value.to_string(),
            "DESTINATION_CONNECTION" => entry.destination_connection = value.to_string(),
            "DESTINATION_CHANNEL" => entry.destination_channel = value.to_string(),
            other => return Err(format!("unknown route field '{}'", other)),
        }
    }

    Ok(by_index.into_values().collect())
}
