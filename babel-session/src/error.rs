//! Error types for credential storage.

use thiserror::Error;

/// Result type for storage operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing file exists but is not a JSON object of strings
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Generic error
    #[error("Session error: {0}")]
    Other(String),
}
