//! confmux command-line reader
//!
//! Opens one configuration adapter and reads keys from it:
//!
//! ```text
//! confmux --adapter json -f conf/app.json -f conf/db.json get db.port --as u16
//! confmux --adapter env -f .env exists DATABASE_URL
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use confmux_core::types::env_text;
use confmux_core::{coerce, open_config, AdapterKind, Coerce, Config, ConfigExt, Value};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "confmux", version, about = "Read values from env files, JSON/YAML documents or memory")]
struct Cli {
    /// Adapter used to read the sources
    #[arg(long, short, env = "CONFMUX_ADAPTER", default_value = "json")]
    adapter: AdapterKind,

    /// Source files, in load order (repeat or comma-separate)
    #[arg(long = "file", short = 'f', env = "CONFMUX_FILES", value_delimiter = ',')]
    files: Vec<PathBuf>,

    /// Print results as JSON objects
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the value of a key
    Get {
        key: String,

        /// Type to coerce the value into
        #[arg(long = "as", value_enum, default_value_t = ValueType::Raw)]
        value_type: ValueType,

        /// Printed instead of failing when the key is missing or mistyped
        #[arg(long)]
        default: Option<String>,
    },
    /// Check whether a key exists; exits with status 1 if it does not
    Exists { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ValueType {
    /// The stored value as-is
    Raw,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
}

#[derive(Debug, Serialize)]
struct Lookup<'a> {
    adapter: &'static str,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    exists: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read `key` as `T`, using `default` (parsed as `T`) as the fallback
fn read_typed<T>(config: &dyn Config, key: &str, default: Option<&str>) -> Result<Value>
where
    T: Coerce + Serialize,
{
    let value: T = match default {
        Some(raw) => {
            let fallback = coerce::<T>(Some(&Value::String(raw.to_string())))
                .with_context(|| format!("--default {raw:?} is not a valid {}", T::TYPE_NAME))?;
            config.get_or(key, fallback)
        }
        None => config.try_get(key)?,
    };
    Ok(serde_json::to_value(value)?)
}

fn read_value(
    config: &dyn Config,
    key: &str,
    value_type: ValueType,
    default: Option<&str>,
) -> Result<Value> {
    match value_type {
        ValueType::Raw => match (config.get(key), default) {
            (Some(value), _) => Ok(value),
            (None, Some(raw)) => Ok(Value::String(raw.to_string())),
            (None, None) => anyhow::bail!("[{}]: key not found: {key}", config.kind()),
        },
        ValueType::Bool => read_typed::<bool>(config, key, default),
        ValueType::I8 => read_typed::<i8>(config, key, default),
        ValueType::I16 => read_typed::<i16>(config, key, default),
        ValueType::I32 => read_typed::<i32>(config, key, default),
        ValueType::I64 => read_typed::<i64>(config, key, default),
        ValueType::Isize => read_typed::<isize>(config, key, default),
        ValueType::U8 => read_typed::<u8>(config, key, default),
        ValueType::U16 => read_typed::<u16>(config, key, default),
        ValueType::U32 => read_typed::<u32>(config, key, default),
        ValueType::U64 => read_typed::<u64>(config, key, default),
        ValueType::Usize => read_typed::<usize>(config, key, default),
        ValueType::F32 => read_typed::<f32>(config, key, default),
        ValueType::F64 => read_typed::<f64>(config, key, default),
        ValueType::String => read_typed::<String>(config, key, default),
    }
}

/// Execute the command, returning whether it succeeded
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    let config = open_config(cli.adapter, cli.files.iter().cloned())
        .with_context(|| format!("failed to open {} config", cli.adapter.as_str()))?;
    debug!(adapter = cli.adapter.as_str(), files = cli.files.len(), "config opened");

    match &cli.command {
        Command::Get {
            key,
            value_type,
            default,
        } => {
            let value = read_value(config.as_ref(), key, *value_type, default.as_deref())?;
            if cli.json {
                let lookup = Lookup {
                    adapter: cli.adapter.as_str(),
                    key,
                    value: Some(value),
                    exists: config.exists(key),
                };
                writeln!(out, "{}", serde_json::to_string(&lookup)?)?;
            } else {
                writeln!(out, "{}", env_text(&value))?;
            }
            Ok(true)
        }
        Command::Exists { key } => {
            let exists = config.exists(key);
            if cli.json {
                let lookup = Lookup {
                    adapter: cli.adapter.as_str(),
                    key,
                    value: None,
                    exists,
                };
                writeln!(out, "{}", serde_json::to_string(&lookup)?)?;
            } else {
                writeln!(out, "{exists}")?;
            }
            Ok(exists)
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let success = run(&cli, &mut io::stdout().lock())?;
    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn run_to_string(args: &[&str]) -> Result<(bool, String)> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        let success = run(&cli, &mut out)?;
        Ok((success, String::from_utf8(out)?))
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "confmux", "--adapter", "env", "-f", "a.env,b.env", "get", "PORT", "--as", "u16",
        ])
        .unwrap();

        assert_eq!(cli.adapter, AdapterKind::Env);
        assert_eq!(cli.files, vec![PathBuf::from("a.env"), PathBuf::from("b.env")]);
        match cli.command {
            Command::Get { key, value_type, default } => {
                assert_eq!(key, "PORT");
                assert_eq!(value_type, ValueType::U16);
                assert!(default.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["confmux", "--adapter", "toml", "exists", "x"]).is_err());
    }

    #[test]
    fn test_get_from_documents() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app.json");
        let db = dir.path().join("db.json");
        fs::write(&app, r#"{"name": "api"}"#).unwrap();
        fs::write(&db, r#"{"port": "5432", "tags": ["a", "b"]}"#).unwrap();
        let app = app.to_str().unwrap();
        let db = db.to_str().unwrap();

        let (_, out) = run_to_string(&["confmux", "-f", app, "-f", db, "get", "app.name"]).unwrap();
        assert_eq!(out, "api\n");

        let (_, out) =
            run_to_string(&["confmux", "-f", app, "-f", db, "get", "db.port", "--as", "u16"])
                .unwrap();
        assert_eq!(out, "5432\n");

        let (_, out) = run_to_string(&["confmux", "-f", app, "-f", db, "get", "db.tags"]).unwrap();
        assert_eq!(out, "[\"a\",\"b\"]\n");

        let (_, out) = run_to_string(&[
            "confmux", "-f", app, "-f", db, "get", "db.missing", "--as", "bool", "--default", "true",
        ])
        .unwrap();
        assert_eq!(out, "true\n");

        assert!(run_to_string(&["confmux", "-f", app, "-f", db, "get", "db.missing"]).is_err());
        assert!(run_to_string(&[
            "confmux", "-f", app, "-f", db, "get", "db.port", "--as", "u8", "--default", "x",
        ])
        .is_err());
    }

    #[test]
    fn test_exists_and_json_output() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("app.json");
        fs::write(&app, r#"{"debug": false}"#).unwrap();
        let app = app.to_str().unwrap();

        let (success, out) = run_to_string(&["confmux", "-f", app, "exists", "debug"]).unwrap();
        assert!(success);
        assert_eq!(out, "true\n");

        let (success, out) = run_to_string(&["confmux", "-f", app, "exists", "nope"]).unwrap();
        assert!(!success);
        assert_eq!(out, "false\n");

        let (_, out) = run_to_string(&["confmux", "-f", app, "get", "debug", "--json"]).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"adapter": "json", "key": "debug", "value": false, "exists": true})
        );
    }
}
