use std::collections::HashMap;
use std::sync::Arc;

use crate::destination::EventDestination;
use crate::error::EventResult;
use crate::models::RouteEntry;

/// Immutable mapping from event name to destination.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Arc<dyn EventDestination>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from entries in configuration order. A repeated event
    /// name replaces the earlier destination.
    pub fn from_routes<F>(entries: &[RouteEntry], mut make_destination: F) -> EventResult<Self>
    where
        F: FnMut(&RouteEntry) -> EventResult<Arc<dyn EventDestination>>,
    {
        let mut table = Self::new();
        for entry in entries {
            let destination = make_destination(entry)?;
            table.insert(entry.event_name.clone(), destination);
        }
        Ok(table)
    }

    /// Returns the replaced destination, if any.
    pub fn insert(
        &mut self,
        event_name: impl Into<String>,
        destination: Arc<dyn EventDestination>,
    ) -> Option<Arc<dyn EventDestination>> {
        let event_name = event_name.into();
        let replaced = self.routes.insert(event_name.clone(), destination);
        if replaced.is_some() {
            tracing::warn!(event_name = %event_name, "Duplicate event route, later entry wins");
        }
        replaced
    }

    pub fn get(&self, event_name: &str) -> Option<&Arc<dyn EventDestination>> {
        self.routes.get(event_name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Sorted event names
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.routes.iter().map(|(name, dest)| (name, dest.channel())))
            .finish()
    }
}
