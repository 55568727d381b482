//! Core trait and types for environment access

use thiserror::Error;

/// Errors that can occur when writing to an environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("invalid variable name {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: &'static str },
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Check that a variable can be written to a process environment
///
/// Names must be non-empty and free of `=` and NUL; values must be free of NUL.
pub fn validate_var(key: &str, value: &str) -> EnvironmentResult<()> {
    validate_key(key)?;
    if value.contains('\0') {
        return Err(EnvironmentError::InvalidValue {
            key: key.to_string(),
            reason: "value contains a NUL character",
        });
    }
    Ok(())
}

fn validate_key(key: &str) -> EnvironmentResult<()> {
    let reason = if key.is_empty() {
        "name is empty"
    } else if key.contains('=') {
        "name contains '='"
    } else if key.contains('\0') {
        "name contains a NUL character"
    } else {
        return Ok(());
    };
    Err(EnvironmentError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

/// Read/write access to a string-keyed environment
///
/// Implementations:
/// - `ProcessEnvironment`: the real process environment
/// - `MemoryEnvironment`: an isolated map for tests and embedding
///
/// `EnvConfig` only touches the environment through this trait.
pub trait Environment: Send + Sync {
    /// Human-readable name of this environment
    fn name(&self) -> &str;

    /// Read a variable, `None` if unset
    fn var(&self, key: &str) -> Option<String>;

    /// Write a variable, replacing any existing binding
    fn set_var(&self, key: &str, value: &str) -> EnvironmentResult<()>;

    /// Check if a variable is bound
    fn contains(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}
