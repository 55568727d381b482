//! Shared value types
//!
//! Configuration values are `serde_json::Value` throughout; adapters tag
//! lookup results with `Resolved` so typed getters know how to coerce them.

mod resolved;
mod text;

pub use serde_json::Value;
pub use resolved::Resolved;
pub use text::{env_text, scalar_text};
