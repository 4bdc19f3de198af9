use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DeleteOutcome, KeyValueStore};
use crate::store::errors::Result;

/// In-process key-value store.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Snapshot of every entry.
    pub async fn entries(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn list_keys(&self) -> Result<Option<BTreeSet<String>>> {
        let entries = self.entries.read().await;
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(entries.keys().cloned().collect()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
        match self.entries.write().await.remove(key) {
            Some(_) => Ok(DeleteOutcome::Deleted),
            None => Ok(DeleteOutcome::KeyNotFound),
        }
    }
}
