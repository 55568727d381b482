//! Environment configuration adapter
//!
//! Invariants:
//! - `load` overwrites existing variables with env-file values (later files
//!   win), then re-applies every override recorded by `set`.
//! - `$VAR`/`${VAR}` references expand against the variables staged so far
//!   (earlier lines and files), then the injected environment; never against
//!   `std::env` unless that is the injected environment.
//! - Every file is parsed and expanded before any variable is written, so a
//!   broken file leaves the environment untouched.
//! - Reads always go to the environment; the override map only feeds reloads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use super::dotenv::{expand, read_env_file};
use super::error::{ConfigError, ConfigResult};
use super::traits::{AdapterKind, Config};
use crate::environment::{Environment, ProcessEnvironment};
use crate::types::{env_text, Resolved};

/// Env file loaded when no paths are given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Configuration backed by environment variables
///
/// Env files (`KEY=VALUE` syntax) are overlaid onto an [`Environment`]; by
/// default the real process environment, so other code reading `std::env`
/// sees the same values. `set` writes through to the environment as well.
///
/// # Example
///
/// ```no_run
/// use confmux_core::{Config, ConfigExt, EnvConfig};
///
/// let mut config = EnvConfig::open([".env", ".env.local"])?;
/// config.set("APP_MODE", "test".into())?;
/// assert_eq!(std::env::var("APP_MODE").unwrap(), "test");
/// let workers = config.uint("APP_WORKERS", 4);
/// # Ok::<(), confmux_core::ConfigError>(())
/// ```
pub struct EnvConfig {
    files: Vec<PathBuf>,
    overrides: HashMap<String, Value>,
    environment: Arc<dyn Environment>,
}

impl EnvConfig {
    /// Create an unloaded config over the process environment
    ///
    /// An empty file list means [`DEFAULT_ENV_FILE`].
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_environment(files, Arc::new(ProcessEnvironment::new()))
    }

    /// Create an unloaded config over a specific environment
    pub fn with_environment<I, P>(files: I, environment: Arc<dyn Environment>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        if files.is_empty() {
            files.push(PathBuf::from(DEFAULT_ENV_FILE));
        }
        Self {
            files,
            overrides: HashMap::new(),
            environment,
        }
    }

    /// Create a config over the process environment and load it
    pub fn open<I, P>(files: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut config = Self::new(files);
        config.load()?;
        Ok(config)
    }

    /// Source files, in load order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The environment this config reads and writes
    pub fn environment(&self) -> &Arc<dyn Environment> {
        &self.environment
    }

    /// Parse and expand every file in order without touching the environment
    ///
    /// Returns the variables in write order; a key set twice appears twice.
    fn stage(&self) -> ConfigResult<Vec<(String, String)>> {
        let mut staged: HashMap<String, String> = HashMap::new();
        let mut vars = Vec::new();

        for path in &self.files {
            for (key, raw) in read_env_file(path)? {
                let value = expand(&raw, |name| {
                    staged
                        .get(name)
                        .cloned()
                        .or_else(|| self.environment.var(name))
                })
                .map_err(|message| ConfigError::parse(AdapterKind::Env, path, message))?;
                staged.insert(key.clone(), value.clone());
                vars.push((key, value));
            }
        }
        Ok(vars)
    }

    fn write(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.environment
            .set_var(key, value)
            .map_err(|source| ConfigError::EnvWrite {
                adapter: AdapterKind::Env,
                key: key.to_string(),
                source,
            })
    }
}

impl Config for EnvConfig {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Env
    }

    fn load(&mut self) -> ConfigResult<()> {
        let vars = self.stage()?;
        for (key, value) in &vars {
            self.write(key, value)?;
        }
        for (key, value) in &self.overrides {
            self.write(key, &env_text(value))?;
        }

        debug!(
            files = self.files.len(),
            vars = vars.len(),
            overrides = self.overrides.len(),
            environment = self.environment.name(),
            "env config loaded"
        );
        Ok(())
    }

    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        // Only record overrides the environment accepted, so reloads can replay them.
        self.write(key, &env_text(&value))?;
        trace!(key, "env config override");
        self.overrides.insert(key.to_string(), value);
        Ok(())
    }

    fn resolve(&self, key: &str) -> Option<Resolved<'_>> {
        self.environment
            .var(key)
            .map(|value| Resolved::owned(Value::String(value)))
    }

    fn exists(&self, key: &str) -> bool {
        self.environment.contains(key)
    }
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("files", &self.files)
            .field("overrides", &self.overrides.len())
            .field("environment", &self.environment.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigExt;
    use crate::environment::MemoryEnvironment;
    use serde_json::json;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_env(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config_in_memory(files: Vec<PathBuf>) -> (EnvConfig, Arc<MemoryEnvironment>) {
        let environment = Arc::new(MemoryEnvironment::new());
        let config = EnvConfig::with_environment(files, environment.clone());
        (config, environment)
    }

    #[test]
    fn test_load_overlays_files() {
        let dir = tempdir().unwrap();
        let base = write_env(dir.path(), ".env", "APP_PORT=8080\nAPP_NAME=api\n");
        let local = write_env(dir.path(), ".env.local", "APP_PORT=9090\n");

        let (mut config, environment) = config_in_memory(vec![base, local]);
        environment.set_var("APP_NAME", "preexisting").unwrap();
        config.load().unwrap();

        // Later files and file values both overwrite
        assert_eq!(config.get("APP_PORT"), Some(json!("9090")));
        assert_eq!(config.get("APP_NAME"), Some(json!("api")));
        assert_eq!(config.uint16("APP_PORT", 0), 9090);
        assert!(config.exists("APP_NAME"));
        assert!(!config.exists("APP_MISSING"));
    }

    #[test]
    fn test_set_writes_through() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "");
        let (mut config, environment) = config_in_memory(vec![path]);
        config.load().unwrap();

        config.set("APP_WORKERS", json!(4)).unwrap();
        config.set("APP_DEBUG", json!(true)).unwrap();
        config.set("APP_NAME", json!("worker")).unwrap();

        assert_eq!(environment.var("APP_WORKERS"), Some("4".to_string()));
        assert_eq!(environment.var("APP_DEBUG"), Some("true".to_string()));
        assert_eq!(environment.var("APP_NAME"), Some("worker".to_string()));

        assert_eq!(config.int("APP_WORKERS", 0), 4);
        assert!(config.bool("APP_DEBUG", false));
        assert_eq!(config.string("APP_NAME", String::new()), "worker");
    }

    #[test]
    fn test_overrides_survive_reload() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "APP_PORT=8080\nAPP_HOST=localhost\n");
        let (mut config, _environment) = config_in_memory(vec![path]);

        config.load().unwrap();
        let first = (config.get("APP_PORT"), config.get("APP_HOST"));
        config.load().unwrap();
        assert_eq!((config.get("APP_PORT"), config.get("APP_HOST")), first);

        config.set("APP_PORT", json!(3000)).unwrap();
        config.load().unwrap();
        assert_eq!(config.get("APP_PORT"), Some(json!("3000")));
        assert_eq!(config.get("APP_HOST"), Some(json!("localhost")));
    }

    #[test]
    fn test_get_reads_environment_not_overrides() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "");
        let (mut config, environment) = config_in_memory(vec![path]);
        config.load().unwrap();

        config.set("APP_MODE", json!("a")).unwrap();
        environment.set_var("APP_MODE", "b").unwrap();
        assert_eq!(config.get("APP_MODE"), Some(json!("b")));
    }

    #[test]
    fn test_set_rejects_invalid_key() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "");
        let (mut config, environment) = config_in_memory(vec![path]);
        config.load().unwrap();

        let err = config.set("BAD=KEY", json!("x")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvWrite { adapter: AdapterKind::Env, .. }));
        assert!(environment.is_empty());

        // The rejected key is not replayed on reload
        config.load().unwrap();
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempdir().unwrap();
        let (mut config, _environment) = config_in_memory(vec![dir.path().join("absent.env")]);

        let err = config.load().unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("[EnvConfig]: "));
    }

    #[test]
    fn test_parse_error_leaves_environment_untouched() {
        let dir = tempdir().unwrap();
        let good = write_env(dir.path(), "good.env", "APP_OK=1\n");
        let bad = write_env(dir.path(), "bad.env", "APP_SECRET='hunter2\n");

        let (mut config, environment) = config_in_memory(vec![good, bad]);
        let err = config.load().unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!err.to_string().contains("hunter2"));
        assert!(environment.is_empty());
    }

    #[test]
    fn test_typed_getters() {
        let dir = tempdir().unwrap();
        let path = write_env(
            dir.path(),
            ".env",
            "FLAG=T\nCOUNT=-12\nRATIO=0.5\nBIG=300\nWORD=hello\n",
        );
        let (mut config, _environment) = config_in_memory(vec![path]);
        config.load().unwrap();

        assert!(config.try_bool("FLAG").unwrap());
        assert_eq!(config.try_int64("COUNT").unwrap(), -12);
        assert!(config.try_uint32("COUNT").is_err());
        assert_eq!(config.uint32("COUNT", 1), 1);
        assert_eq!(config.try_float32("RATIO").unwrap(), 0.5);
        assert_eq!(config.try_int8("BIG").unwrap(), 44);
        assert_eq!(config.try_string("WORD").unwrap(), "hello");
        assert!(config.try_int("WORD").is_err());

        let err = config.try_string("NOPE").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_references_see_earlier_files() {
        let dir = tempdir().unwrap();
        let base = write_env(dir.path(), "a.env", "APP_BASE=/srv\n");
        let data = write_env(
            dir.path(),
            "b.env",
            "APP_DATA=${APP_BASE}/data\nAPP_LOGS=$APP_DATA/logs\nAPP_RAW='${APP_BASE}'\n",
        );

        let (mut config, environment) = config_in_memory(vec![base, data]);
        config.load().unwrap();

        assert_eq!(environment.var("APP_DATA"), Some("/srv/data".to_string()));
        assert_eq!(environment.var("APP_LOGS"), Some("/srv/data/logs".to_string()));
        assert_eq!(environment.var("APP_RAW"), Some("${APP_BASE}".to_string()));
    }

    #[test]
    fn test_references_use_injected_environment() {
        let dir = tempdir().unwrap();
        let path = write_env(
            dir.path(),
            ".env",
            "APP_URL=http://${APP_HOST}:8080\nAPP_HOST=shadowed\n",
        );

        let (mut config, environment) = config_in_memory(vec![path]);
        environment.set_var("APP_HOST", "db.local").unwrap();
        config.load().unwrap();

        assert_eq!(config.get("APP_URL"), Some(json!("http://db.local:8080")));
        assert_eq!(config.get("APP_HOST"), Some(json!("shadowed")));
    }

    #[test]
    #[serial]
    fn test_process_variables_do_not_leak_into_memory_environment() {
        std::env::set_var("CONFMUX_TEST_LEAK_SECRET", "from-real-process");
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "APP_COPY=${CONFMUX_TEST_LEAK_SECRET}\n");

        let (mut config, environment) = config_in_memory(vec![path]);
        let result = config.load();
        std::env::remove_var("CONFMUX_TEST_LEAK_SECRET");

        result.unwrap();
        assert_eq!(environment.var("APP_COPY"), Some(String::new()));
        assert!(!environment.contains("CONFMUX_TEST_LEAK_SECRET"));
    }

    #[test]
    fn test_unterminated_reference_fails_load() {
        let dir = tempdir().unwrap();
        let good = write_env(dir.path(), "good.env", "APP_OK=1\n");
        let bad = write_env(dir.path(), "bad.env", "APP_BROKEN=\"${APP_OK\"\n");

        let (mut config, environment) = config_in_memory(vec![good, bad]);
        let err = config.load().unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(environment.is_empty());
    }

    #[test]
    fn test_default_file() {
        let config = EnvConfig::with_environment(
            Vec::<PathBuf>::new(),
            Arc::new(MemoryEnvironment::new()),
        );
        assert_eq!(config.files(), &[PathBuf::from(DEFAULT_ENV_FILE)]);
    }

    #[test]
    #[serial]
    fn test_process_environment() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "CONFMUX_TEST_ENV_CONFIG=from-file\n");

        let mut config = EnvConfig::open([path]).unwrap();
        assert_eq!(std::env::var("CONFMUX_TEST_ENV_CONFIG").unwrap(), "from-file");

        config.set("CONFMUX_TEST_ENV_CONFIG", json!("override")).unwrap();
        assert_eq!(std::env::var("CONFMUX_TEST_ENV_CONFIG").unwrap(), "override");

        config.load().unwrap();
        assert_eq!(
            config.string("CONFMUX_TEST_ENV_CONFIG", String::new()),
            "override"
        );

        std::env::remove_var("CONFMUX_TEST_ENV_CONFIG");
    }
}
