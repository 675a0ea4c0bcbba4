//! # Babel API
//!
//! Typed handlers for every Babel endpoint. Each handler issues one request
//! through the CSRF interceptor and maps the outcome to a value or an
//! [`ApiError`]; the only state they touch is the [`CredentialStore`].
//!
//! | Handler | Request | Host |
//! |---|---|---|
//! | [`BabelClient::ensure_csrf`] | `GET /get-csrf` | auth |
//! | [`BabelClient::login`] | `POST /login` | auth |
//! | [`BabelClient::register`] | `POST /register` | auth |
//! | [`BabelClient::logout`] | `GET /purge-family` | auth |
//! | [`BabelClient::delete_account`] | `DELETE /delete-account` | api |
//! | [`BabelClient::translate`] | `POST /translate-text` | api |
//! | [`BabelClient::transcribe`] | `POST /transcript-speech` | api |
//! | [`BabelClient::fetch_history`] | `GET /fetch-history` | api |
//! | [`BabelClient::fetch_languages`] | `GET /fetch-languages` | api |
//!
//! ## Example
//!
//! ```rust,no_run
//! use babel_api::{ApiConfig, BabelClient, LoginForm, TranslationRequest};
//! use babel_session::CredentialStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), babel_api::ApiError> {
//!     let client = BabelClient::new(ApiConfig::new("http://localhost:5000"), CredentialStore::in_memory())?;
//!
//!     client.ensure_csrf().await?;
//!     client.login(&LoginForm::new("ada", "hunter2")).await?;
//!
//!     let text = client
//!         .translate(&TranslationRequest::new("hola", "auto", "en"))
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! [`CredentialStore`]: babel_session::CredentialStore

mod auth;
mod client;
mod config;
mod error;
mod history;
mod languages;
mod transcribe;
mod translate;

pub use auth::{
    ACCOUNT_DELETED_MESSAGE, AuthSession, DELETE_ACCOUNT_PATH, LOGGED_OUT_MESSAGE, LOGIN_PATH,
    LOGOUT_PATH, LoginForm, REGISTER_PATH, RegisterForm,
};
pub use client::{BabelClient, GET_CSRF_PATH};
pub use config::{ApiConfig, ApiConfigBuilder};
pub use error::{ApiError, Result};
pub use history::{EXHAUSTED_HEADER, HISTORY_PATH, HistoryEntry, HistoryPage, HistoryQuery};
pub use languages::{AUTO_DETECT, LANGUAGES_PATH, Language, LanguageCatalog};
pub use transcribe::{
    AUDIO_FIELD, AudioUpload, SUPPORTED_AUDIO_EXTENSIONS, TRANSCRIBE_PATH, Transcription,
};
pub use translate::{TRANSLATE_PATH, TranslationRequest};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::auth::{AuthSession, LoginForm, RegisterForm};
    pub use crate::client::BabelClient;
    pub use crate::config::ApiConfig;
    pub use crate::error::{ApiError, Result};
    pub use crate::history::{HistoryPage, HistoryQuery};
    pub use crate::languages::{Language, LanguageCatalog};
    pub use crate::transcribe::{AudioUpload, Transcription};
    pub use crate::translate::TranslationRequest;
}
