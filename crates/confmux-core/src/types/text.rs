//! Textual forms of configuration values

use serde_json::Value;

/// Text of a scalar value: strings verbatim, numbers and booleans as written
/// in JSON. Null, arrays and objects have no scalar text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text stored in an environment variable for `value`
///
/// Scalars use [`scalar_text`]; everything else is serialized as compact JSON.
pub fn env_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_else(|| value.to_string())
}
