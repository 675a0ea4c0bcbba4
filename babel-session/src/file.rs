//! JSON file storage backend.

use crate::error::{SessionError, SessionResult};
use crate::traits::KeyValueStorage;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

type Entries = BTreeMap<String, String>;

/// Storage persisted as a single JSON object on disk.
///
/// Every operation re-reads the file, so values written by an earlier run
/// (or another process) are visible. A missing file reads as empty storage.
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write never leaves a truncated file behind.
///
/// # Examples
///
/// ```no_run
/// use babel_session::{CredentialStore, FileStorage};
///
/// # async fn example() -> babel_session::SessionResult<()> {
/// let store = CredentialStore::new(FileStorage::new("/home/me/.babel/credentials.json"));
/// if let Some(token) = store.get_token().await? {
///     println!("token carried over from last run: {}", token);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> SessionResult<Entries> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            SessionError::Deserialization(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write_entries(&self, entries: &Entries) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        babel_log::trace!("Wrote {} credential keys to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "credentials".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    async fn update<F>(&self, mutate: F) -> SessionResult<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send,
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if mutate(&mut entries) {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> SessionResult<()> {
        self.update(|entries| entries.remove(key).is_some()).await
    }

    async fn clear(&self) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> SessionResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));

        assert_eq!(storage.get("access_exp").await.unwrap(), None);
        assert!(storage.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileStorage::new(&path)
            .set("access_exp", "1760000000")
            .await
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("access_exp").await.unwrap(),
            Some("1760000000".to_string())
        );
        assert!(!dir.path().join("nested").join(".credentials.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let storage = FileStorage::new(&path);

        storage.set("leeway", "30").await.unwrap();
        assert!(path.exists());

        storage.clear().await.unwrap();
        assert!(!path.exists());
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get("leeway").await,
            Err(SessionError::Deserialization(_))
        ));
    }
}
