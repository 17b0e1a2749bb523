use async_trait::async_trait;
use crate::Result;

/// String key-value store the session lives in.
///
/// Stands in for the browser's local storage: values survive restarts when
/// the backend is persistent, and every key is independent.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value, `None` when the key was never set or has been removed
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
