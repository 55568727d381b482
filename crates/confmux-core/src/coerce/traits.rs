//! Core trait and error type for value coercion

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while coercing a stored value into a primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// No value was stored for the key
    #[error("value is missing")]
    Missing,

    #[error("cannot use {found} value as {expected}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot parse {input:?} as {expected}")]
    Parse { expected: &'static str, input: String },

    #[error("negative value cannot be used as {expected}")]
    Negative { expected: &'static str },
}

impl CoercionError {
    /// Create a type mismatch error for `value`
    pub fn mismatch(expected: &'static str, value: &Value) -> Self {
        Self::Mismatch {
            expected,
            found: value_kind(value),
        }
    }

    /// Create a parse error for textual input
    pub fn parse(expected: &'static str, input: impl Into<String>) -> Self {
        Self::Parse {
            expected,
            input: input.into(),
        }
    }

    /// Whether this error means the value was absent rather than unusable
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

pub type CoercionResult<T> = Result<T, CoercionError>;

/// A primitive type that stored configuration values can be coerced into
///
/// Implemented for `bool`, every signed and unsigned integer width, `f32`,
/// `f64` and `String`. Narrowing integer coercions wrap like `as` casts.
///
/// # Example
///
/// ```
/// use confmux_core::coerce::{coerce, coerce_or};
/// use serde_json::json;
///
/// assert_eq!(coerce::<u16>(Some(&json!("8080"))).unwrap(), 8080);
/// assert_eq!(coerce_or::<bool>(Some(&json!("maybe")), true), true);
/// ```
pub trait Coerce: Sized {
    /// Human-readable type name used in error messages
    const TYPE_NAME: &'static str;

    /// Convert a present value into `Self`
    fn coerce_from(value: &Value) -> CoercionResult<Self>;
}

/// Strict coercion: fails on an absent value or one that cannot become `T`
pub fn coerce<T: Coerce>(value: Option<&Value>) -> CoercionResult<T> {
    match value {
        Some(value) => T::coerce_from(value),
        None => Err(CoercionError::Missing),
    }
}

/// Fallback coercion: returns `fallback` whenever [`coerce`] fails
pub fn coerce_or<T: Coerce>(value: Option<&Value>, fallback: T) -> T {
    coerce(value).unwrap_or(fallback)
}

/// JSON type name of a value, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
