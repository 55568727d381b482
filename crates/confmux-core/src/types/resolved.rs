//! Tagged lookup results

use std::borrow::Cow;

use serde_json::Value;

use super::text::scalar_text;
use crate::coerce::{Coerce, CoercionResult};

/// A value found by an adapter lookup, tagged with where it came from
///
/// The tag decides how typed getters coerce it:
/// - `Concrete` values (overrides, environment strings, memory entries) are
///   coerced directly from their native form.
/// - `Node` values are handles into a merged document. They are coerced from
///   their JSON type first and, failing that, from their textual form, so a
///   number node reads as a string and a numeric string node reads as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Concrete(Cow<'a, Value>),
    Node(&'a Value),
}

impl<'a> Resolved<'a> {
    /// Concrete value owned by the result (e.g. read from an environment)
    pub fn owned(value: Value) -> Self {
        Resolved::Concrete(Cow::Owned(value))
    }

    /// Concrete value borrowed from an adapter's override mapping
    pub fn borrowed(value: &'a Value) -> Self {
        Resolved::Concrete(Cow::Borrowed(value))
    }

    /// Unwrap into an owned value
    pub fn into_value(self) -> Value {
        match self {
            Resolved::Concrete(value) => value.into_owned(),
            Resolved::Node(node) => node.clone(),
        }
    }

    /// Coerce into `T` following the tag's rules
    pub fn coerce<T: Coerce>(&self) -> CoercionResult<T> {
        match self {
            Resolved::Concrete(value) => T::coerce_from(value),
            Resolved::Node(node) => T::coerce_from(node).or_else(|err| match scalar_text(node) {
                Some(text) => T::coerce_from(&Value::String(text)).map_err(|_| err),
                None => Err(err),
            }),
        }
    }
}
