use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pm_core::{Result, SessionStorage};
use tokio::sync::RwLock;

/// Volatile backend, used by tests and `--storage memory`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
