//! Typed access to the stored credentials.

use crate::error::SessionResult;
use crate::traits::KeyValueStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the CSRF token (also the header name).
pub const CSRF_TOKEN_KEY: &str = "X-CSRF-TOKEN";
/// Storage key for the access-token expiry, in Unix seconds.
pub const ACCESS_EXP_KEY: &str = "access_exp";
/// Storage key for the renewal leeway, in seconds.
pub const LEEWAY_KEY: &str = "leeway";

/// Everything the client remembers about its session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub csrf_token: Option<String>,
    pub access_exp: Option<i64>,
    pub leeway: i64,
}

impl Credentials {
    /// Expiry as a UTC timestamp, if one is stored and representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.access_exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.csrf_token.is_none() && self.access_exp.is_none() && self.leeway == 0
    }
}

/// CSRF token, access expiry and leeway on top of a [`KeyValueStorage`].
///
/// Cheap to clone; clones share the same backend. The interceptor, the
/// reauthentication loop and the API handlers all hold one.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn from_arc(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by a fresh [`MemoryStorage`](crate::MemoryStorage).
    pub fn in_memory() -> Self {
        Self::new(crate::MemoryStorage::new())
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    pub async fn get_token(&self) -> SessionResult<Option<String>> {
        self.storage.get(CSRF_TOKEN_KEY).await
    }

    /// Overwrite the stored token.
    pub async fn set_token(&self, token: &str) -> SessionResult<()> {
        self.storage.set(CSRF_TOKEN_KEY, token).await
    }

    /// Stored expiry; a value that is not an integer reads as absent.
    pub async fn get_expiry(&self) -> SessionResult<Option<i64>> {
        let raw = self.storage.get(ACCESS_EXP_KEY).await?;
        Ok(raw.and_then(|value| value.trim().parse::<i64>().ok()))
    }

    pub async fn set_expiry(&self, access_exp: i64) -> SessionResult<()> {
        self.storage
            .set(ACCESS_EXP_KEY, &access_exp.to_string())
            .await
    }

    /// Stored leeway in whole seconds, `0` when unset or unparseable.
    pub async fn get_leeway(&self) -> SessionResult<i64> {
        let raw = self.storage.get(LEEWAY_KEY).await?;
        Ok(raw.as_deref().map(parse_leeway).unwrap_or(0))
    }

    pub async fn set_leeway(&self, leeway: i64) -> SessionResult<()> {
        self.storage.set(LEEWAY_KEY, &leeway.to_string()).await
    }

    /// Record a freshly issued expiry together with its leeway.
    pub async fn set_session_expiry(&self, access_exp: i64, leeway: i64) -> SessionResult<()> {
        self.set_expiry(access_exp).await?;
        self.set_leeway(leeway).await
    }

    /// Forget everything, as on logout or account deletion.
    pub async fn clear_all(&self) -> SessionResult<()> {
        self.storage.clear().await?;
        babel_log::debug!("Cleared stored credentials");
        Ok(())
    }

    pub async fn snapshot(&self) -> SessionResult<Credentials> {
        Ok(Credentials {
            csrf_token: self.get_token().await?,
            access_exp: self.get_expiry().await?,
            leeway: self.get_leeway().await?,
        })
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

fn parse_leeway(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return secs;
    }
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() => secs.trunc() as i64,
        _ => 0,
    }
}
