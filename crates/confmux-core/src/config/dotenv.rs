//! Env file reading with injectable variable expansion
//!
//! dotenvy parses the `KEY=VALUE` syntax (quotes, escapes, comments,
//! multi-line values) but expands `$VAR` against `std::env` while parsing.
//! Before parsing, every `$` that dotenvy would expand is swapped for
//! [`REFERENCE_MARK`], so values come back with their references intact and
//! [`expand`] resolves them against whatever lookup the caller supplies.
//! Single-quoted and backslash-escaped dollars stay literal.

use std::fs;
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::traits::AdapterKind;

/// Stands in for an expandable `$` while dotenvy parses (a Unicode noncharacter)
const REFERENCE_MARK: char = '\u{FDD0}';

/// Parse one env file into `(key, value)` pairs, references unexpanded
pub(super) fn read_env_file(path: &Path) -> ConfigResult<Vec<(String, String)>> {
    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::read(AdapterKind::Env, path, e))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    if content.contains(REFERENCE_MARK) {
        return Err(ConfigError::parse(
            AdapterKind::Env,
            path,
            "contains the reserved character U+FDD0",
        ));
    }

    let marked = mark_references(content);
    dotenvy::from_read_iter(marked.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| dotenv_error(path, e))
}

/// Map a dotenvy error without echoing file content, which may hold secrets
fn dotenv_error(path: &Path, err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::Io(source) => ConfigError::read(AdapterKind::Env, path, source),
        dotenvy::Error::LineParse(_, index) => ConfigError::parse(
            AdapterKind::Env,
            path,
            format!("invalid syntax at position {index}"),
        ),
        other => ConfigError::parse(AdapterKind::Env, path, other.to_string()),
    }
}

/// Where the scanner is within a logical line, as dotenvy's line reader sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Bare,
    Space,
    Escape,
    Strong,
    StrongEscape,
    Weak,
    WeakEscape,
    Comment,
}

impl Scan {
    /// Inside a quoted value that continues onto the next line
    fn is_open_quote(self) -> bool {
        matches!(
            self,
            Scan::Strong | Scan::StrongEscape | Scan::Weak | Scan::WeakEscape
        )
    }

    fn next(self, c: char) -> Scan {
        match self {
            Scan::Comment => Scan::Comment,
            Scan::Space => match c {
                '#' => Scan::Comment,
                '\\' => Scan::Escape,
                '"' => Scan::Weak,
                '\'' => Scan::Strong,
                _ => Scan::Bare,
            },
            Scan::Bare => match c {
                c if c.is_whitespace() && c != '\n' && c != '\r' => Scan::Space,
                '\\' => Scan::Escape,
                '"' => Scan::Weak,
                '\'' => Scan::Strong,
                _ => Scan::Bare,
            },
            Scan::Escape => Scan::Bare,
            Scan::Weak => match c {
                '\\' => Scan::WeakEscape,
                '"' => Scan::Bare,
                _ => Scan::Weak,
            },
            Scan::WeakEscape => Scan::Weak,
            Scan::Strong => match c {
                '\\' => Scan::StrongEscape,
                '\'' => Scan::Bare,
                _ => Scan::Strong,
            },
            Scan::StrongEscape => Scan::Strong,
        }
    }
}

/// Replace every `$` dotenvy would expand with [`REFERENCE_MARK`]
///
/// Follows dotenvy's line reader: whole-line `#` comments, trailing comments
/// after whitespace, and quotes spanning lines. A `$` is expandable unless it
/// is single-quoted or escaped.
fn mark_references(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut state = Scan::Bare;

    for line in content.split_inclusive('\n') {
        if !state.is_open_quote() {
            state = Scan::Bare;
            if line.trim_start().starts_with('#') {
                out.push_str(line);
                continue;
            }
        }
        for c in line.chars() {
            let expandable = c == '$' && matches!(state, Scan::Bare | Scan::Space | Scan::Weak);
            state = state.next(c);
            out.push(if expandable { REFERENCE_MARK } else { c });
        }
    }
    out
}

/// Expand the references left in a parsed value
///
/// `${NAME}` takes everything up to the closing brace; `$NAME` takes
/// alphanumerics and underscores. Unknown names expand to nothing. Fails only
/// on a `${` without its closing brace.
pub(super) fn expand<F>(value: &str, lookup: F) -> Result<String, &'static str>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains(REFERENCE_MARK) {
        return Ok(value.to_string());
    }

    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != REFERENCE_MARK {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        if chars.next_if_eq(&'{').is_some() {
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(ch) => name.push(ch),
                    None => return Err("unterminated ${...} reference"),
                }
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
        }

        if !name.is_empty() {
            if let Some(resolved) = lookup(&name) {
                out.push_str(&resolved);
            }
        }
    }
    Ok(out)
}
