//! Session-invalid notices.

/// Shown once when the server refuses to reissue the access token.
pub const SESSION_INVALID_NOTICE: &str = "It seems there is an issue with your session. \
Please reauthenticate to continue using Babel. We apologize for the inconvenience. \
If this issue persists, contact support";

/// Receives the notice raised when silent reauthentication is refused.
pub trait Notifier: Send + Sync {
    fn session_invalid(&self, message: &str);
}

/// Notifier that writes the notice to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn session_invalid(&self, message: &str) {
        babel_log::error!("{}", message);
    }
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn session_invalid(&self, message: &str) {
        self(message)
    }
}
