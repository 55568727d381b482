//! Environment variable storage
//!
//! `EnvConfig` reads and writes variables through the `Environment` trait:
//! - `ProcessEnvironment`: the real process environment
//! - `MemoryEnvironment`: an isolated in-memory map

mod traits;
mod process;
mod memory;

pub use traits::{validate_var, Environment, EnvironmentError, EnvironmentResult};
pub use process::ProcessEnvironment;
pub use memory::MemoryEnvironment;
