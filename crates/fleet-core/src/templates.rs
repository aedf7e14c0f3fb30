//! Canonical template store

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Loads canonical content for tracked files from the templates directory.
///
/// Templates are loaded once per file category and are immutable for the
/// run's duration.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deployed name for a template source name.
    ///
    /// A leading `__` keeps a template inert inside the templates directory
    /// (tooling scanning that directory ignores it); the prefix is stripped
    /// when the file lands in a repository.
    pub fn deployed_name(source: &str) -> &str {
        source.strip_prefix("__").unwrap_or(source)
    }

    /// Read a template. An unreadable template is fatal to the run.
    pub fn load(&self, source: &str) -> Result<String> {
        let path = self.root.join(source);
        fs::read_to_string(&path).map_err(|e| Error::Template {
            name: source.to_string(),
            source: e,
        })
    }
}
