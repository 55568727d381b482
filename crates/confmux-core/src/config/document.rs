//! Document configuration adapter (JSON, YAML)
//!
//! Merges one or more document files into a single tree addressed by dotted
//! paths. With several files each is nested under its file stem
//! (`conf/db.json` → `db.*`); a single file's top-level object is the root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::path::lookup;
use super::traits::{AdapterKind, Config};
use crate::types::Resolved;

/// Document syntax, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` files are YAML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    /// Parse `content` into a document tree
    pub fn parse(&self, content: &str) -> Result<Value, String> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Configuration merged from document files
///
/// Lookups check the override mapping (flat keys, filled by `set`) before the
/// merged document, so an override always shadows the file value. The merged
/// document is never modified by `set`.
///
/// # Example
///
/// ```no_run
/// use confmux_core::{Config, ConfigExt, DocumentConfig};
///
/// let config = DocumentConfig::open(["conf/app.json", "conf/db.json"])?;
/// let host = config.string("db.host", "localhost".to_string());
/// let port = config.uint16("db.port", 5432);
/// # Ok::<(), confmux_core::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    files: Vec<PathBuf>,
    overrides: HashMap<String, Value>,
    document: Value,
}

impl DocumentConfig {
    /// Create an unloaded document config; call `load` before reading
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            overrides: HashMap::new(),
            document: Value::Object(Map::new()),
        }
    }

    /// Create a document config and load it
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

    /// The merged document
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Read and parse one source file
    fn read_document(path: &Path) -> ConfigResult<Value> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::read(AdapterKind::Json, path, e))?;
        DocumentFormat::from_path(path)
            .parse(&content)
            .map_err(|message| ConfigError::parse(AdapterKind::Json, path, message))
    }

    /// Build the merged document from all source files
    fn merge(files: &[PathBuf]) -> ConfigResult<Value> {
        match files {
            [] => Ok(Value::Object(Map::new())),
            [single] => match Self::read_document(single)? {
                root @ Value::Object(_) => Ok(root),
                other => {
                    let mut root = Map::new();
                    root.insert(file_stem(single), other);
                    Ok(Value::Object(root))
                }
            },
            _ => {
                let mut root = Map::new();
                for path in files {
                    let content = Self::read_document(path)?;
                    let stem = file_stem(path);
                    if root.contains_key(&stem) {
                        warn!(path = %path.display(), stem = %stem, "duplicate document name, keeping the first");
                        continue;
                    }
                    root.insert(stem, content);
                }
                Ok(Value::Object(root))
            }
        }
    }
}

/// File name without its extension
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Config for DocumentConfig {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Json
    }

    fn load(&mut self) -> ConfigResult<()> {
        // A failed load keeps the previous document.
        self.document = Self::merge(&self.files)?;
        debug!(
            files = self.files.len(),
            overrides = self.overrides.len(),
            "document config loaded"
        );
        Ok(())
    }

    fn set(&mut self, key: &str, value: Value) -> ConfigResult<()> {
        trace!(key, "document config override");
        self.overrides.insert(key.to_string(), value);
        Ok(())
    }

    fn resolve(&self, key: &str) -> Option<Resolved<'_>> {
        if let Some(value) = self.overrides.get(key) {
            return Some(Resolved::borrowed(value));
        }
        lookup(&self.document, key).map(Resolved::Node)
    }
}
