// Babel - session client for the Babel translation service
//
// Keeps a CSRF token attached to every request, renews the access token
// before it expires, and exposes the translation, transcription, history
// and account endpoints as typed async calls.

// Re-export the API client
pub use babel_api::*;

// Re-export the building blocks
pub use babel_http_client;
pub use babel_log;
pub use babel_reauth;
pub use babel_session;

#[cfg(feature = "config")]
pub use babel_config;

pub use babel_reauth::{
    Notifier, ReauthConfig, ReauthHandle, ReauthLoop, ReauthState, ReauthThreshold,
    SESSION_INVALID_NOTICE,
};
pub use babel_session::{CredentialStore, Credentials, FileStorage, KeyValueStorage, MemoryStorage};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ApiConfig,
        ApiError,
        AudioUpload,
        AuthSession,
        BabelClient,
        CredentialStore,
        Credentials,
        FileStorage,
        HistoryPage,
        HistoryQuery,
        KeyValueStorage,
        LanguageCatalog,
        LoginForm,
        MemoryStorage,
        // Reauthentication
        Notifier,
        ReauthConfig,
        ReauthHandle,
        ReauthLoop,
        ReauthState,
        ReauthThreshold,
        RegisterForm,
        Transcription,
        TranslationRequest,
    };
}
