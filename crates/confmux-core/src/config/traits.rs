//! Configuration adapter traits

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::error::{ConfigError, ConfigResult, UnknownAdapter};
use crate::coerce::{Coerce, CoercionError};
use crate::types::Resolved;

/// Which adapter produced a value or an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    /// Environment variables merged from env files
    Env,
    /// JSON (or YAML) documents merged into one tree
    Json,
    /// Plain in-memory map
    Memory,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Env => "env",
            AdapterKind::Json => "json",
            AdapterKind::Memory => "memory",
        }
    }

    /// Tag used as the prefix of error messages
    pub fn tag(&self) -> &'static str {
        match self {
            AdapterKind::Env => "EnvConfig",
            AdapterKind::Json => "JsonConfig",
            AdapterKind::Memory => "MemoryConfig",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AdapterKind {
    type Err = UnknownAdapter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "env" | "dotenv" => Ok(AdapterKind::Env),
            "json" | "yaml" | "document" => Ok(AdapterKind::Json),
            "memory" | "mem" => Ok(AdapterKind::Memory),
            _ => Err(UnknownAdapter(s.to_string())),
        }
    }
}

/// Configuration adapter abstraction
///
/// Implementations:
/// - `EnvConfig`: env files overlaid on an environment
/// - `DocumentConfig`: JSON/YAML files merged into one document
/// - `MemoryConfig`: a plain key/value map
///
/// Values passed to `set` are overrides: they win over anything the backing
/// store holds for the same key. Typed reads live on [`ConfigExt`].
///
/// Adapters are not internally synchronized; share one across threads only
/// behind a lock.
pub trait Config: Send {
    /// Which adapter this is
    fn kind(&self) -> AdapterKind;

    /// (Re)load the backing sources
    fn load(&mut self) -> ConfigResult<()>;

    /// Set an override for `key`
    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()>;

    /// Look up `key`, tagging where the value came from
    fn resolve(&self, key: &str) -> Option<Resolved<'_>>;

    /// Get the value for `key` in its native form, `None` if absent
    fn get(&self, key: &str) -> Option<Value> {
        self.resolve(key).map(Resolved::into_value)
    }

    /// Check if `key` resolves, even to a null value
    fn exists(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }
}

// Strict and fallback getter pairs, one per primitive type.
macro_rules! typed_getters {
    ($($ty:ty => $try_name:ident, $name:ident;)+) => {
        $(
            #[doc = concat!("Read `key` as `", stringify!($ty), "`, failing if it is missing or unusable")]
            fn $try_name(&self, key: &str) -> ConfigResult<$ty> {
                self.try_get::<$ty>(key)
            }

            #[doc = concat!("Read `key` as `", stringify!($ty), "`, or `fallback` on any failure")]
            fn $name(&self, key: &str, fallback: $ty) -> $ty {
                self.get_or::<$ty>(key, fallback)
            }
        )+
    };
}

/// Typed getters for every [`Config`], including `dyn Config`
///
/// # Example
///
/// ```
/// use confmux_core::{ConfigExt, MemoryConfig};
///
/// let config = MemoryConfig::with_values([("retries", 3)]);
/// assert_eq!(config.int("retries", 0), 3);
/// assert_eq!(config.int("missing", 7), 7);
/// assert!(config.try_bool("retries").is_err());
/// ```
pub trait ConfigExt: Config {
    /// Read `key` as `T`, failing if it is missing or cannot be coerced
    fn try_get<T: Coerce>(&self, key: &str) -> ConfigResult<T> {
        self.resolve(key)
            .ok_or(CoercionError::Missing)
            .and_then(|resolved| resolved.coerce::<T>())
            .map_err(|source| ConfigError::coercion(self.kind(), key, source))
    }

    /// Read `key` as `T`, returning `fallback` on any failure
    fn get_or<T: Coerce>(&self, key: &str, fallback: T) -> T {
        self.try_get(key).unwrap_or(fallback)
    }

    typed_getters! {
        bool => try_bool, bool;
        isize => try_int, int;
        i8 => try_int8, int8;
        i16 => try_int16, int16;
        i32 => try_int32, int32;
        i64 => try_int64, int64;
        usize => try_uint, uint;
        u8 => try_uint8, uint8;
        u16 => try_uint16, uint16;
        u32 => try_uint32, uint32;
        u64 => try_uint64, uint64;
        f32 => try_float32, float32;
        f64 => try_float64, float64;
        String => try_string, string;
    }
}

impl<C: Config + ?Sized> ConfigExt for C {}
