//! In-memory environment

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{validate_var, Environment, EnvironmentResult};

/// In-memory environment for tests and embedding
///
/// Applies the same name and value rules as the process environment, so code
/// that works against it will not fail differently in production. Share it
/// through `Arc` to observe what an `EnvConfig` wrote.
///
/// # Example
///
/// ```
/// use confmux_core::environment::{Environment, MemoryEnvironment};
///
/// let environment = MemoryEnvironment::new();
/// environment.set_var("APP_PORT", "8080").unwrap();
/// assert_eq!(environment.var("APP_PORT"), Some("8080".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    vars: RwLock<HashMap<String, String>>,
}

impl MemoryEnvironment {
    /// Create a new empty environment
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
        }
    }

    /// Create an environment with initial variables
    pub fn with_vars(initial: HashMap<String, String>) -> Self {
        Self {
            vars: RwLock::new(initial),
        }
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Environment for MemoryEnvironment {
    fn name(&self) -> &str {
        "memory"
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }

    fn set_var(&self, key: &str, value: &str) -> EnvironmentResult<()> {
        validate_var(key, value)?;
        self.vars.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
