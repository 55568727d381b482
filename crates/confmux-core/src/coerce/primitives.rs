//! `Coerce` implementations for the supported primitive types

use serde_json::Value;

use super::traits::{Coerce, CoercionError, CoercionResult};

/// Parse the boolean literals accepted by configuration values
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(input: &str) -> Option<bool> {
    match input {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Coerce for bool {
    const TYPE_NAME: &'static str = "bool";

    fn coerce_from(value: &Value) -> CoercionResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => {
                parse_bool(s).ok_or_else(|| CoercionError::parse(Self::TYPE_NAME, s.as_str()))
            }
            other => Err(CoercionError::mismatch(Self::TYPE_NAME, other)),
        }
    }
}

impl Coerce for String {
    const TYPE_NAME: &'static str = "string";

    fn coerce_from(value: &Value) -> CoercionResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(CoercionError::mismatch(Self::TYPE_NAME, other)),
        }
    }
}

/// Read any integer value as a 64-bit signed integer
fn signed(value: &Value, expected: &'static str) -> CoercionResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(u) = n.as_u64() {
                Ok(u as i64)
            } else {
                Err(CoercionError::parse(expected, n.to_string()))
            }
        }
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| CoercionError::parse(expected, s.as_str())),
        other => Err(CoercionError::mismatch(expected, other)),
    }
}

/// Read any non-negative integer value as a 64-bit unsigned integer
fn unsigned(value: &Value, expected: &'static str) -> CoercionResult<u64> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if n.as_i64().is_some() {
                Err(CoercionError::Negative { expected })
            } else {
                Err(CoercionError::parse(expected, n.to_string()))
            }
        }
        Value::String(s) => match s.parse::<u64>() {
            Ok(u) => Ok(u),
            Err(_) if s.starts_with('-') && s[1..].parse::<u64>().is_ok() => {
                Err(CoercionError::Negative { expected })
            }
            Err(_) => Err(CoercionError::parse(expected, s.as_str())),
        },
        other => Err(CoercionError::mismatch(expected, other)),
    }
}

fn float(value: &Value, expected: &'static str) -> CoercionResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CoercionError::parse(expected, n.to_string())),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| CoercionError::parse(expected, s.as_str())),
        other => Err(CoercionError::mismatch(expected, other)),
    }
}

// Narrowing casts truncate; a config value of 300 read as i8 yields 44.
macro_rules! impl_coerce_int {
    ($read:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Coerce for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn coerce_from(value: &Value) -> CoercionResult<Self> {
                    $read(value, Self::TYPE_NAME).map(|n| n as $ty)
                }
            }
        )+
    };
}

impl_coerce_int!(signed => i8, i16, i32, i64, isize);
impl_coerce_int!(unsigned => u8, u16, u32, u64, usize);

impl Coerce for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn coerce_from(value: &Value) -> CoercionResult<Self> {
        float(value, Self::TYPE_NAME)
    }
}

impl Coerce for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn coerce_from(value: &Value) -> CoercionResult<Self> {
        float(value, Self::TYPE_NAME).map(|f| f as f32)
    }
}
