use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use pm_core::{Error, Result, SessionStorage};

pub mod backends;

pub use backends::*;

/// Which session backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    Memory,
    #[default]
    File,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::File => f.write_str("file"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(Error::Storage(format!(
                "Unknown storage backend: {}. Available backends: memory, file",
                other
            ))),
        }
    }
}

/// `<data dir>/pamyatka/session.json`, or the working directory when the
/// platform has no data dir.
pub fn default_session_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pamyatka")
        .join("session.json")
}

pub async fn create_storage(kind: StorageKind, path: Option<&Path>) -> Result<Arc<dyn SessionStorage>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(InMemoryStorage::new())),
        StorageKind::File => {
            let path = path.map(Path::to_path_buf).unwrap_or_else(default_session_path);
            Ok(Arc::new(FileStorage::open(path).await?))
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageKind};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_parsing() {
        assert_eq!("memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!("FILE".parse::<StorageKind>().unwrap(), StorageKind::File);
        let err = "redis".parse::<StorageKind>().unwrap_err();
        assert!(err.to_string().contains("Available backends"));
    }

    #[tokio::test]
    async fn test_create_file_storage_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = create_storage(StorageKind::File, Some(&path)).await.unwrap();
        storage.set("auth_token", "abc").await.unwrap();
        assert!(path.exists());
    }
}
