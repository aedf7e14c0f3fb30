//! Hook-list document adapter backed by serde_yaml
//!
//! A YAML document with a top-level `repos` sequence, each entry keyed by a
//! URI-like `repo` field and carrying a pinned `rev` and an ordered `hooks`
//! list. Identifier matching is exact-string. Equality is decided on dumped
//! text, and `dump` is deterministic for a given document.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Parse a hook-list document.
pub fn load(raw: &str) -> Result<Value> {
    serde_yaml::from_str(raw).map_err(|e| Error::parse("YAML", e.to_string()))
}

/// Serialize a hook-list document.
pub fn dump(doc: &Value) -> Result<String> {
    serde_yaml::to_string(doc).map_err(|e| Error::parse("YAML", e.to_string()))
}

/// The entries of the `repos` sequence, empty if the key is absent.
pub fn entries(doc: &Value) -> Vec<Value> {
    doc.get("repos")
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default()
}

/// The `repo` identifier field of one entry.
pub fn entry_uri(entry: &Value) -> Option<&str> {
    entry.get("repo").and_then(Value::as_str)
}

/// All entries of `doc` whose identifier matches `uri` exactly.
pub fn find_matches<'a>(doc: &'a [Value], uri: &str) -> Vec<&'a Value> {
    doc.iter()
        .filter(|entry| entry_uri(entry) == Some(uri))
        .collect()
}

/// A copy of `doc` with its `repos` sequence replaced, other keys untouched.
pub fn with_entries(doc: &Value, entries: Vec<Value>) -> Value {
    let mut mapping = match doc {
        Value::Mapping(mapping) => mapping.clone(),
        _ => Mapping::new(),
    };
    mapping.insert(
        Value::String("repos".to_string()),
        Value::Sequence(entries),
    );
    Value::Mapping(mapping)
}
