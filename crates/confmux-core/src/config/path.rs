//! Dotted-path addressing into document trees
//!
//! `database.host` walks object keys, `servers.0.name` indexes arrays with
//! numeric segments, and `\.` escapes a dot that is part of a key
//! (`hosts.example\.com`).

use serde_json::Value;

/// Split a dotted key into its segments, honouring `\.` escapes
pub fn split_path(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    segments
}

/// Find the node at `key`, `None` if any segment is missing
///
/// An explicit `null` in the document is a found node.
pub fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }

    split_path(key)
        .iter()
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
