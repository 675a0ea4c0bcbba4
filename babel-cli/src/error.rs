//! Error types for the Babel CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (prompts, terminal output)
    Io(std::io::Error),

    /// Configuration could not be loaded or failed validation
    Config(String),

    /// A Babel request failed
    Api(babel_api::ApiError),

    /// The credential file could not be read or written
    Session(String),

    /// Reauthentication loop error
    Reauth(String),

    /// Interactive prompt failed
    Prompt(String),

    /// Invalid argument
    InvalidArgument(String),

    /// Command execution error
    Command(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Api(e) => write!(f, "{}", e),
            CliError::Session(msg) => write!(f, "Credential storage error: {}", msg),
            CliError::Reauth(msg) => write!(f, "Reauthentication error: {}", msg),
            CliError::Prompt(msg) => write!(f, "Prompt error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Command(msg) => write!(f, "Command error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<babel_api::ApiError> for CliError {
    fn from(e: babel_api::ApiError) -> Self {
        CliError::Api(e)
    }
}

impl From<babel_config::ConfigError> for CliError {
    fn from(e: babel_config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<babel_session::SessionError> for CliError {
    fn from(e: babel_session::SessionError) -> Self {
        CliError::Session(e.to_string())
    }
}

impl From<babel_reauth::ReauthError> for CliError {
    fn from(e: babel_reauth::ReauthError) -> Self {
        CliError::Reauth(e.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_shown_verbatim() {
        let err = CliError::from(babel_api::ApiError::Rejected {
            message: "Invalid credentials".to_string(),
            status: 401,
        });
        assert_eq!(err.to_string(), "Invalid credentials\nCode: 401");
    }

    #[test]
    fn test_config_error_prefix() {
        let err = CliError::from(babel_config::ConfigError::ValidationError(
            "api_base_url is not a URL".to_string(),
        ));
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
