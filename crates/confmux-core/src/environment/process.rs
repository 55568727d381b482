//! Process environment access

use std::env;

use super::traits::{validate_var, Environment, EnvironmentResult};

/// The real, process-wide environment
///
/// Values that are not valid UTF-8 are read lossily, so a bound variable is
/// always readable.
///
/// Writes are visible to everything else in the process, including child
/// processes spawned afterwards. Concurrent writers race; treat the process
/// environment as having a single owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a handle to the process environment
    pub fn new() -> Self {
        Self
    }
}

impl Environment for ProcessEnvironment {
    fn name(&self) -> &str {
        "process"
    }

    fn var(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    fn set_var(&self, key: &str, value: &str) -> EnvironmentResult<()> {
        validate_var(key, value)?;
        env::set_var(key, value);
        Ok(())
    }
}
