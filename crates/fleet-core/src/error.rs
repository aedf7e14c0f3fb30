//! Error types for fleet-core

/// Result type for fleet-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling the fleet
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from a format adapter
    #[error(transparent)]
    Content(#[from] fleet_content::Error),

    /// Error from the version-control collaborator
    #[error(transparent)]
    Git(#[from] fleet_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A canonical template could not be read. Fatal to the run.
    #[error("Failed to read template {name}: {source}")]
    Template {
        name: String,
        source: std::io::Error,
    },

    /// A catalog override file could not be parsed
    #[error("Failed to parse catalog: {0}")]
    Catalog(#[from] toml::de::Error),

    /// The operator interrupted the run. Fatal to the run, caught once at
    /// the run boundary.
    #[error("Interrupted by operator")]
    Interrupted,
}
