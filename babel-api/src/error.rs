//! API error types.

use babel_http_client::{HttpClientError, StatusCode};
use babel_session::SessionError;
use thiserror::Error;

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the feature handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login or registration refused by the server.
    #[error("{message}\nCode: {status}")]
    Rejected { message: String, status: u16 },

    /// No CSRF token could be obtained.
    #[error("{0}")]
    CsrfIssuance(String),

    /// The two passwords entered for account deletion differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Account deletion refused with 401.
    #[error("Incorrect Password")]
    IncorrectPassword,

    /// Audio file with an extension the service does not accept.
    #[error("Invalid file extension chosen: {0}")]
    UnsupportedAudio(String),

    /// A required input was missing before any request was made.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// A success response without the expected fields.
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Any other non-success status.
    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    /// Transport failure.
    #[error(transparent)]
    Client(#[from] HttpClientError),

    /// Credential storage failure.
    #[error(transparent)]
    Storage(#[from] SessionError),

    /// Local file access failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a response status.
    pub fn status(status: StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::IncorrectPassword => Some(401),
            _ => None,
        }
    }

    /// Whether the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::PasswordMismatch | Self::UnsupportedAudio(_) | Self::Integrity(_) | Self::Io(_)
        )
    }
}
