//! Flattened, read-only view of the resolved process configuration.
//!
//! Keys use `section:key` notation (`server:port`, `events:routes:0:event_name`).
//! Values are not redacted.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    entries: BTreeMap<String, String>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every environment variable with a non-empty UTF-8 value.
    pub fn from_env() -> Self {
        Self::from_pairs(crate::env_vars())
    }

    /// Builds a snapshot from raw pairs, skipping empty values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self { entries }
    }

    /// Later inserts win.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        let value = value.to_string();
        if !value.is_empty() {
            self.entries.insert(key.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Indented JSON object, keys sorted.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
