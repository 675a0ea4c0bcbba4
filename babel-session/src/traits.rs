//! Key/value storage trait definition.

use crate::error::SessionResult;
use async_trait::async_trait;

/// String key/value storage backend.
///
/// Mirrors what a browser's `localStorage` offers: flat string keys, string
/// values, and a way to wipe everything. Each call is atomic on its own;
/// there is no ordering across calls, so concurrent writers are
/// last-write-wins.
///
/// # Examples
///
/// ```
/// use babel_session::{KeyValueStorage, MemoryStorage};
///
/// # async fn example() -> babel_session::SessionResult<()> {
/// let storage = MemoryStorage::new();
/// storage.set("leeway", "30").await?;
/// assert_eq!(storage.get("leeway").await?, Some("30".to_string()));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> SessionResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> SessionResult<()>;

    /// Remove every key.
    async fn clear(&self) -> SessionResult<()>;

    /// All stored keys, in no particular order.
    async fn keys(&self) -> SessionResult<Vec<String>>;

    // ========== Convenience Methods ==========

    /// Check if a key is present.
    async fn contains(&self, key: &str) -> SessionResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Number of stored keys.
    async fn len(&self) -> SessionResult<usize> {
        Ok(self.keys().await?.len())
    }

    /// Whether the storage holds no keys.
    async fn is_empty(&self) -> SessionResult<bool> {
        Ok(self.len().await? == 0)
    }
}
