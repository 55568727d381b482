//! Configuration adapters
//!
//! Supports multiple configuration sources behind one `Config` trait:
//! - `EnvConfig`: env files overlaid on the (process) environment
//! - `DocumentConfig`: JSON/YAML files merged into one document
//! - `MemoryConfig`: in-memory map

mod traits;
mod error;
mod env;
mod dotenv;
mod document;
mod memory;
pub mod path;

pub use traits::{AdapterKind, Config, ConfigExt};
pub use error::{ConfigError, ConfigResult, UnknownAdapter};
pub use env::{EnvConfig, DEFAULT_ENV_FILE};
pub use document::{DocumentConfig, DocumentFormat};
pub use memory::MemoryConfig;
