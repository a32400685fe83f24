//! Storage trait definitions

use crate::credential::{ItemId, StoredItem};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for vault items.
///
/// Backends store the `password` envelope verbatim and never look inside it.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Insert or fully replace an item
    async fn put(&self, item: &StoredItem) -> Result<()>;

    /// Fetch an item by id
    async fn get(&self, id: ItemId) -> Result<Option<StoredItem>>;

    /// Remove an item, reporting whether it existed
    async fn delete(&self, id: ItemId) -> Result<bool>;

    /// All items of one owner, in insertion order
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<StoredItem>>;
}
