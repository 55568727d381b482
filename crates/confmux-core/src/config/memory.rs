//! In-memory configuration adapter

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::error::ConfigResult;
use super::traits::{AdapterKind, Config};
use crate::types::Resolved;

/// Configuration held entirely in a key/value map
///
/// There is no backing store: every entry is an override, and typed getters
/// coerce the stored value directly. Keys are flat; `"a.b"` is just a key.
///
/// # Example
///
/// ```
/// use confmux_core::{Config, ConfigExt, MemoryConfig};
///
/// let mut config = MemoryConfig::new();
/// config.set("debug", true.into()).unwrap();
/// assert!(config.bool("debug", false));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryConfig {
    data: HashMap<String, Value>,
}

impl MemoryConfig {
    /// Create a new empty memory config
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Create a memory config with initial values
    pub fn with_values<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            data: initial
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over stored keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

impl Config for MemoryConfig {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Memory
    }

    fn load(&mut self) -> ConfigResult<()> {
        // Nothing to read; the map is the whole configuration.
        trace!(keys = self.data.len(), "memory config loaded");
        Ok(())
    }

    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        trace!(key, "memory config override");
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn resolve(&self, key: &str) -> Option<Resolved<'_>> {
        self.data.get(key).map(Resolved::borrowed)
    }

    fn exists(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}
