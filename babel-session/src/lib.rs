//! Client-side credential storage for Babel.
//!
//! The browser front end kept three values in `localStorage`: the CSRF
//! token, the access-token expiry and the renewal leeway. This crate keeps
//! the same three values behind an injectable [`KeyValueStorage`] backend
//! so they can live in memory or survive between runs in a JSON file.
//!
//! | Key | Meaning |
//! |---|---|
//! | `X-CSRF-TOKEN` | token echoed back on every request |
//! | `access_exp` | access-token expiry, Unix seconds |
//! | `leeway` | renewal tolerance, seconds |
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, gone when the process exits
//! - [`FileStorage`] - JSON object on disk, written atomically
//!
//! # Examples
//!
//! ```
//! use babel_session::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SessionError> {
//!     let store = CredentialStore::in_memory();
//!
//!     store.set_token("1f0c...").await?;
//!     store.set_session_expiry(1_760_000_000, 30).await?;
//!
//!     let creds = store.snapshot().await?;
//!     assert_eq!(creds.access_exp, Some(1_760_000_000));
//!     assert_eq!(creds.leeway, 30);
//!
//!     // Logout
//!     store.clear_all().await?;
//!     assert!(store.snapshot().await?.is_empty());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod traits;

pub use error::{SessionError, SessionResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use store::{ACCESS_EXP_KEY, CSRF_TOKEN_KEY, CredentialStore, Credentials, LEEWAY_KEY};
pub use traits::KeyValueStorage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::file::FileStorage;
    pub use crate::memory::MemoryStorage;
    pub use crate::store::{CredentialStore, Credentials};
    pub use crate::traits::KeyValueStorage;
}
