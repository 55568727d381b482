//! confmux core
//!
//! Pluggable configuration resolution. One `Config` interface over three
//! backends, each with typed getters that either fail or fall back:
//! - `EnvConfig`: env files overlaid on the process environment
//! - `DocumentConfig`: JSON/YAML files merged into one dotted-path document
//! - `MemoryConfig`: a plain in-memory map
//!
//! Values set with `Config::set` are overrides and always win over the
//! backing store.
//!
//! ```rust,no_run
//! use confmux_core::{manager, ConfigExt};
//!
//! let config = manager::new_document_config(["conf/app.json", "conf/db.json"])?;
//!
//! // Strict read: missing or mistyped values are errors
//! let host: String = config.try_string("db.host")?;
//!
//! // Best-effort read: any failure yields the fallback
//! let pool = config.uint("db.pool_size", 8);
//! # Ok::<(), confmux_core::ConfigError>(())
//! ```
//!
//! Adapters are synchronous and not internally synchronized.

pub mod types;
pub mod coerce;
pub mod environment;
pub mod config;
pub mod manager;

// Re-export commonly used types
pub use types::{Resolved, Value};

pub use coerce::{coerce, coerce_or, Coerce, CoercionError, CoercionResult};

pub use environment::{Environment, EnvironmentError, MemoryEnvironment, ProcessEnvironment};

pub use config::{
    AdapterKind, Config, ConfigError, ConfigExt, ConfigResult,
    DocumentConfig, EnvConfig, MemoryConfig,
};

pub use manager::{new_document_config, new_env_config, new_memory_config, open_config};
