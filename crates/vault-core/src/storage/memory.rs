//! In-memory storage backend

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::VaultStore;
use crate::credential::{ItemId, StoredItem};
use crate::error::Result;

/// Insertion-ordered in-memory store; contents vanish with the process
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<IndexMap<ItemId, StoredItem>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items across all owners
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no items
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl VaultStore for MemoryStore {
    async fn put(&self, item: &StoredItem) -> Result<()> {
        self.items.write().await.insert(item.id, item.clone());
        debug!("Stored item: {}", item.id);
        Ok(())
    }

    async fn get(&self, id: ItemId) -> Result<Option<StoredItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let removed = self.items.write().await.shift_remove(&id).is_some();
        if removed {
            debug!("Deleted item: {}", id);
        }
        Ok(removed)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<StoredItem>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.user_id == owner)
            .cloned()
            .collect())
    }
}
