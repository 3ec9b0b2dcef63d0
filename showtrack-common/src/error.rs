//! Common error types for showtrack

use thiserror::Error;

/// Common result type for showtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the store, configuration and schema layers
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A show, universe or episode lookup matched no row
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Viewer is not allowed to modify the resource (creator-only operations)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A stored row could not be decoded (malformed uuid or date text)
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
