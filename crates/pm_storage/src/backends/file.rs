use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pm_core::{Error, Result, SessionStorage};
use tokio::sync::Mutex;

/// Persistent backend: a single JSON object of string values on disk.
///
/// The whole map is kept in memory and rewritten on every change. Writes go
/// to a sibling temp file that is then renamed over the original, so a crash
/// leaves either the old or the new session, never a torn one. The in-memory
/// copy only changes once the write has succeeded.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Discarding unreadable session file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Opened session file {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(values)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            Error::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("auth_token", "token-1").await.unwrap();
        storage.set("user", r#"{"id":1,"username":"officer1"}"#).await.unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get("auth_token").await.unwrap().as_deref(), Some("token-1"));
        assert!(reopened.get("user").await.unwrap().unwrap().contains("officer1"));

        reopened.remove("auth_token").await.unwrap();
        let again = FileStorage::open(&path).await.unwrap();
        assert!(again.get("auth_token").await.unwrap().is_none());
        assert!(again.get("user").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_files_start_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileStorage::open(dir.path().join("none.json")).await.unwrap();
        assert!(missing.get("user").await.unwrap().is_none());
        // Removing from an empty store does not create the file.
        missing.remove("user").await.unwrap();
        assert!(!missing.path().exists());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, b"{not json").unwrap();
        let storage = FileStorage::open(&corrupt).await.unwrap();
        assert!(storage.get("auth_token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_values_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("pamyatka");
        let storage = FileStorage::open(parent.join("session.json")).await.unwrap();
        storage.set("user", "{}").await.unwrap();

        // Parent directory replaced by a plain file: every write now fails.
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, b"").unwrap();

        assert!(storage.set("auth_token", "t").await.is_err());
        assert!(storage.get("auth_token").await.unwrap().is_none());
        assert!(storage.remove("user").await.is_err());
        assert_eq!(storage.get("user").await.unwrap().as_deref(), Some("{}"));
    }
}
