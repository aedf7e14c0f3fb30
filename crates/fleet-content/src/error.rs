//! Error types for fleet-content

/// Result type for fleet-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or editing tracked documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Table not found: {path}")]
    TableNotFound { path: String },

    #[error("Value not found: {path}")]
    ValueNotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }
}
