//! Error types for fleet-git

/// Result type for fleet-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in git and forge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
