//! Error types for reauthentication.

use babel_http_client::HttpClientError;
use babel_session::SessionError;
use std::time::Duration;
use thiserror::Error;

/// Result type for reauthentication operations.
pub type ReauthResult<T> = Result<T, ReauthError>;

/// Reauthentication errors.
#[derive(Debug, Error)]
pub enum ReauthError {
    /// The server rejected the session (401); the loop stops for good
    #[error("Session is no longer valid, reauthentication required")]
    SessionInvalid,

    /// Any other non-success status
    #[error("{status}: Silent Reauthentication failed, details: {reason}")]
    Status { status: u16, reason: String },

    /// The success body lacked a usable `access_exp`
    #[error("Malformed reissue response: {0}")]
    MalformedResponse(String),

    /// The renewal did not finish in time
    #[error("Reauthentication timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure
    #[error(transparent)]
    Client(#[from] HttpClientError),

    /// Credential storage failure
    #[error(transparent)]
    Storage(#[from] SessionError),

    /// Loop already spawned
    #[error("Reauthentication loop already running")]
    AlreadyRunning,
}

impl ReauthError {
    /// Whether the loop should keep ticking after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SessionInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ReauthError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "500: Silent Reauthentication failed, details: Internal Server Error"
        );
    }

    #[test]
    fn test_only_session_invalid_is_fatal() {
        assert!(!ReauthError::SessionInvalid.is_recoverable());
        assert!(ReauthError::Timeout(Duration::from_secs(30)).is_recoverable());
        assert!(ReauthError::MalformedResponse("x".into()).is_recoverable());
    }
}
