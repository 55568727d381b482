//! Adapter error types

use std::path::PathBuf;

use thiserror::Error;

use super::traits::AdapterKind;
use crate::coerce::CoercionError;
use crate::environment::EnvironmentError;

/// Errors raised by configuration adapters
///
/// Every variant carries the adapter that raised it; messages are prefixed
/// with its tag, e.g. `[JsonConfig]: ...`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source file could not be read
    #[error("[{adapter}]: failed to read {}: {source}", .path.display())]
    Read {
        adapter: AdapterKind,
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source file was read but its content is invalid
    #[error("[{adapter}]: {} is invalid: {message}", .path.display())]
    Parse {
        adapter: AdapterKind,
        path: PathBuf,
        message: String,
    },

    /// Writing to the environment failed
    #[error("[{adapter}]: failed to set {key}: {source}")]
    EnvWrite {
        adapter: AdapterKind,
        key: String,
        source: EnvironmentError,
    },

    /// A typed read failed because the value is missing or has the wrong type
    #[error("[{adapter}]: failed to read {key}: {source}")]
    Coercion {
        adapter: AdapterKind,
        key: String,
        source: CoercionError,
    },
}

impl ConfigError {
    /// Create a file read error
    pub fn read(adapter: AdapterKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            adapter,
            path: path.into(),
            source,
        }
    }

    /// Create an invalid content error
    pub fn parse(adapter: AdapterKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            adapter,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a typed read error
    pub fn coercion(adapter: AdapterKind, key: impl Into<String>, source: CoercionError) -> Self {
        Self::Coercion {
            adapter,
            key: key.into(),
            source,
        }
    }

    /// The adapter that raised this error
    pub fn adapter(&self) -> AdapterKind {
        match self {
            Self::Read { adapter, .. }
            | Self::Parse { adapter, .. }
            | Self::EnvWrite { adapter, .. }
            | Self::Coercion { adapter, .. } => *adapter,
        }
    }

    /// Whether a typed read failed because the key does not exist
    ///
    /// Distinguishes "key absent" from "present but not coercible"; fallback
    /// getters treat both the same.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Coercion {
                source: CoercionError::Missing,
                ..
            }
        )
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Returned when parsing an unknown adapter name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown config adapter: {0}")]
pub struct UnknownAdapter(pub String);
