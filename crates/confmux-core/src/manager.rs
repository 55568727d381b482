//! Adapter construction
//!
//! Every constructor loads its adapter before returning, so callers never hold
//! a config whose sources failed to load.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{AdapterKind, Config, ConfigResult, DocumentConfig, EnvConfig, MemoryConfig};

/// Create a loaded environment config over the process environment
///
/// An empty path list loads `.env`.
pub fn new_env_config<I, P>(files: I) -> ConfigResult<Box<dyn Config>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    Ok(Box::new(EnvConfig::open(files)?))
}

/// Create a loaded document config from JSON/YAML files
///
/// # Example
///
/// ```no_run
/// use confmux_core::{manager, ConfigExt};
///
/// let config = manager::new_document_config(["a.json", "b.json"])?;
/// let x = config.int("a.x", 0);
/// # Ok::<(), confmux_core::ConfigError>(())
/// ```
pub fn new_document_config<I, P>(files: I) -> ConfigResult<Box<dyn Config>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    Ok(Box::new(DocumentConfig::open(files)?))
}

/// Create a loaded in-memory config seeded with `initial`
pub fn new_memory_config<I, K, V>(initial: I) -> ConfigResult<Box<dyn Config>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mut config = MemoryConfig::with_values(initial);
    config.load()?;
    Ok(Box::new(config))
}

/// Create a loaded config of the given kind
///
/// `files` feed the env and document adapters; the memory adapter starts
/// empty and ignores them.
pub fn open_config<I, P>(kind: AdapterKind, files: I) -> ConfigResult<Box<dyn Config>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    debug!(adapter = kind.as_str(), "opening config");
    match kind {
        AdapterKind::Env => new_env_config(files),
        AdapterKind::Json => new_document_config(files),
        AdapterKind::Memory => {
            let ignored = files.into_iter().count();
            if ignored > 0 {
                warn!(files = ignored, "memory config ignores source files");
            }
            new_memory_config(Vec::<(String, Value)>::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigExt};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_new_memory_config() {
        let config = new_memory_config([("retries", 3)]).unwrap();
        assert_eq!(config.kind(), AdapterKind::Memory);
        assert_eq!(config.int("retries", 0), 3);
        assert_eq!(config.int("missing", 7), 7);
    }

    #[test]
    fn test_new_document_config() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, r#"{"x":1}"#).unwrap();
        fs::write(&b, r#"{"y":2}"#).unwrap();

        let config = new_document_config([a, b]).unwrap();
        assert_eq!(config.get("a.x"), Some(json!(1)));
        assert_eq!(config.get("b.y"), Some(json!(2)));
        assert!(!config.exists("a.z"));
    }

    #[test]
    fn test_constructor_surfaces_load_failure() {
        let dir = tempdir().unwrap();
        let err = new_document_config([dir.path().join("missing.json")]).err().unwrap();
        assert!(matches!(err, ConfigError::Read { adapter: AdapterKind::Json, .. }));

        let err = new_env_config([dir.path().join("missing.env")]).err().unwrap();
        assert_eq!(err.adapter(), AdapterKind::Env);
    }

    #[test]
    fn test_open_config_by_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.json");
        fs::write(&path, r#"{"name":"api"}"#).unwrap();

        let mut config = open_config("json".parse().unwrap(), [path.clone()]).unwrap();
        assert_eq!(config.kind(), AdapterKind::Json);
        assert_eq!(config.string("name", String::new()), "api");

        // Overrides work through the trait object
        config.set("name", json!("worker")).unwrap();
        assert_eq!(config.try_string("name").unwrap(), "worker");

        let config = open_config(AdapterKind::Memory, [path]).unwrap();
        assert!(!config.exists("name"));
    }
}
