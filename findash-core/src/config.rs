// findash-core/src/config.rs
//! Per-widget option bags, persisted independently from the layout.
//!
//! Bags are keyed by widget id and are never reconciled against the catalog:
//! entries for disabled or retired widgets are kept as-is.

use crate::{DashboardEvent, EventBus, KeyValueStorage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single option value. Only primitives cross the storage boundary.
///
/// A stored blob holding anything else (`null`, arrays, nested objects) fails
/// to parse as a whole, so every widget's bag is dropped on load, not just the
/// offending one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret command-line style input: `true`/`false`, then numbers, else text
    pub fn parse_loose(input: &str) -> Self {
        match input {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => match input.parse::<f64>() {
                Ok(n) if n.is_finite() => ConfigValue::Number(n),
                _ => ConfigValue::Text(input.to_string()),
            },
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value as f64)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Number(f64::from(value))
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

pub type ConfigBag = BTreeMap<String, ConfigValue>;

/// Build a bag from `key => value` pairs
#[macro_export]
macro_rules! config_bag {
    () => {
        $crate::ConfigBag::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut bag = $crate::ConfigBag::new();
        $(bag.insert(::std::string::String::from($key), $crate::ConfigValue::from($value));)+
        bag
    }};
}

pub struct ConfigStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    entries: BTreeMap<String, ConfigBag>,
    bus: Option<EventBus>,
}

impl ConfigStore {
    pub const DEFAULT_KEY: &'static str = "widget-config";

    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            key: Self::DEFAULT_KEY.to_string(),
            entries: BTreeMap::new(),
            bus: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the in-memory mapping with what storage holds; anything unreadable means empty
    pub fn load(&mut self) {
        self.entries = self.read_saved().unwrap_or_default();
        tracing::debug!(key = %self.key, widgets = self.entries.len(), "widget config loaded");
        self.publish(DashboardEvent::ConfigLoaded);
    }

    /// Bag for `id`; empty when nothing was recorded
    pub fn get(&self, id: &str) -> ConfigBag {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    pub fn value(&self, id: &str, key: &str) -> Option<&ConfigValue> {
        self.entries.get(id)?.get(key)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entries(&self) -> &BTreeMap<String, ConfigBag> {
        &self.entries
    }

    /// Shallow-merge `partial` into the bag for `id`
    pub fn update<I, K>(&mut self, id: &str, partial: I)
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        let bag = self.entries.entry(id.to_string()).or_default();
        bag.extend(partial.into_iter().map(|(k, v)| (k.into(), v)));

        self.persist();
        self.publish(DashboardEvent::ConfigUpdated {
            widget_id: id.to_string(),
        });
    }

    /// Drop the entry for `id` entirely
    pub fn reset_one(&mut self, id: &str) -> bool {
        if self.entries.remove(id).is_none() {
            return false;
        }
        self.persist();
        self.publish(DashboardEvent::ConfigReset {
            widget_id: Some(id.to_string()),
        });
        true
    }

    pub fn reset_all(&mut self) {
        self.entries.clear();
        self.persist();
        self.publish(DashboardEvent::ConfigReset { widget_id: None });
    }

    fn read_saved(&self) -> Option<BTreeMap<String, ConfigBag>> {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "config storage unavailable");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!(key = %self.key, error = %e, "discarding malformed config"))
            .ok()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(blob) => {
                if let Err(e) = self.storage.set(&self.key, &blob) {
                    tracing::warn!(key = %self.key, error = %e, "failed to persist config");
                }
            }
            Err(e) => tracing::warn!(key = %self.key, error = %e, "failed to serialize config"),
        }
    }

    fn publish(&self, event: DashboardEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("key", &self.key)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
