//! Nested-table document adapter backed by toml_edit
//!
//! Documents are addressed by explicit dotted key paths. Lookups never
//! create: a missing table or value is an error, so a malformed repository
//! document surfaces instead of being silently restructured. toml_edit keeps
//! comments and key order intact, which matters because reconciled documents
//! are diffed textually.

use toml_edit::{Array, DocumentMut, Item, Table};

use crate::error::{Error, Result};

/// Parse a nested-table document, preserving comments and key order.
pub fn load(raw: &str) -> Result<DocumentMut> {
    raw.parse()
        .map_err(|e: toml_edit::TomlError| Error::parse("TOML", e.to_string()))
}

/// Dump a document. An unmodified document dumps byte-identically.
pub fn dump(doc: &DocumentMut) -> String {
    doc.to_string()
}

/// Mutable table at a dotted key path. Absence of any segment is an error.
pub fn table_at<'a>(doc: &'a mut DocumentMut, path: &str) -> Result<&'a mut Table> {
    let mut table = doc.as_table_mut();
    for part in path.split('.') {
        table = table
            .get_mut(part)
            .and_then(Item::as_table_mut)
            .ok_or_else(|| Error::TableNotFound {
                path: path.to_string(),
            })?;
    }
    Ok(table)
}

/// Read-only table at a dotted key path. Absence of any segment is an error.
pub fn require_table<'a>(doc: &'a DocumentMut, path: &str) -> Result<&'a Table> {
    let mut table = doc.as_table();
    for part in path.split('.') {
        table = table
            .get(part)
            .and_then(Item::as_table)
            .ok_or_else(|| Error::TableNotFound {
                path: path.to_string(),
            })?;
    }
    Ok(table)
}

/// A copy of the item `key` inside the table at `path`. Absence of either
/// is an error.
pub fn item_at(doc: &DocumentMut, path: &str, key: &str) -> Result<Item> {
    require_table(doc, path)?
        .get(key)
        .cloned()
        .ok_or_else(|| Error::ValueNotFound {
            path: format!("{path}.{key}"),
        })
}

/// Sort a string array in place, ascending. Non-string entries are dropped.
pub fn sort_string_array(array: &mut Array) {
    let mut values: Vec<String> = array
        .iter()
        .filter_map(|value| value.as_str().map(str::to_string))
        .collect();
    values.sort();
    *array = Array::from_iter(values);
}
