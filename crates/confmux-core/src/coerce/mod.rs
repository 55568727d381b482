//! Value coercion engine
//!
//! Converts untyped configuration values into primitives:
//! - `coerce`: strict, returns `CoercionError` on absent or unusable values
//! - `coerce_or`: best-effort, returns the caller's fallback instead

mod traits;
mod primitives;

pub use traits::{coerce, coerce_or, value_kind, Coerce, CoercionError, CoercionResult};
pub use primitives::parse_bool;
