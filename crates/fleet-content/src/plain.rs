//! Plain-text adapter: identity load/dump, exact string equality

/// Load raw text. Identity; exists so every tracked format has the same
/// load/dump shape.
pub fn load(raw: &str) -> String {
    raw.to_string()
}

/// Dump text. Identity.
pub fn dump(document: &str) -> String {
    document.to_string()
}
