//! JSON file storage backend
//!
//! Keeps every item in one `vault.json` in the user's data directory. The
//! password field is already an envelope, so the file itself is plain JSON.

use async_trait::async_trait;
use directories::ProjectDirs;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::VaultStore;
use crate::credential::{ItemId, StoredItem};
use crate::error::{Result, VaultError};

const FILE_VERSION: u32 = 1;

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    items: Vec<StoredItem>,
}

/// JSON file storage backend
pub struct JsonFileStore {
    /// Directory for storage files
    storage_dir: PathBuf,
    /// In-memory copy of the file, in insertion order
    cache: RwLock<IndexMap<ItemId, StoredItem>>,
}

impl JsonFileStore {
    /// Open the store in the default data directory
    pub async fn new() -> Result<Self> {
        Self::open(Self::default_storage_dir()?).await
    }

    /// Open the store in `storage_dir`, loading any existing file
    pub async fn open(storage_dir: PathBuf) -> Result<Self> {
        let store = Self::with_dir(storage_dir)?;
        store.load().await?;
        Ok(store)
    }

    /// Create with a custom storage directory without reading it
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        debug!("JSON file store at: {:?}", storage_dir);

        Ok(Self {
            storage_dir,
            cache: RwLock::new(IndexMap::new()),
        })
    }

    /// Get the default storage directory
    pub fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("rs", "vault", "vault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                VaultError::StorageError("Could not determine data directory".to_string())
            })
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn storage_file_path(&self) -> PathBuf {
        self.storage_dir.join("vault.json")
    }

    /// Load storage from disk
    pub async fn load(&self) -> Result<()> {
        let path = self.storage_file_path();

        if !path.exists() {
            debug!("No existing storage file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let file: StorageFile = serde_json::from_str(&contents)?;
        if file.version != FILE_VERSION {
            return Err(VaultError::StorageError(format!(
                "Unsupported storage file version {}",
                file.version
            )));
        }

        let mut cache = self.cache.write().await;
        *cache = file.items.into_iter().map(|item| (item.id, item)).collect();

        debug!("Loaded {} items from storage", cache.len());
        Ok(())
    }

    /// Write `cache` to disk; caller holds the write lock and commits the
    /// new map only once this succeeds
    async fn save(&self, cache: &IndexMap<ItemId, StoredItem>) -> Result<()> {
        let file = StorageFile {
            version: FILE_VERSION,
            items: cache.values().cloned().collect(),
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.storage_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} items to storage", cache.len());
        Ok(())
    }
}

#[async_trait]
impl VaultStore for JsonFileStore {
    async fn put(&self, item: &StoredItem) -> Result<()> {
        let mut cache = self.cache.write().await;
        let mut updated = cache.clone();
        updated.insert(item.id, item.clone());

        self.save(&updated).await?;
        *cache = updated;

        debug!("Stored item: {}", item.id);
        Ok(())
    }

    async fn get(&self, id: ItemId) -> Result<Option<StoredItem>> {
        Ok(self.cache.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(&id) {
            return Ok(false);
        }

        let mut updated = cache.clone();
        updated.shift_remove(&id);

        self.save(&updated).await?;
        *cache = updated;
        debug!("Deleted item: {}", id);
        Ok(true)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<StoredItem>> {
        let cache = self.cache.read().await;

        Ok(cache
            .values()
            .filter(|item| item.user_id == owner)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn item(owner: &str, website: &str) -> StoredItem {
        StoredItem {
            id: ItemId::new(),
            user_id: owner.to_string(),
            website: website.to_string(),
            username: "me".to_string(),
            password: "bm9uY2U=:Y2lwaGVy".to_string(),
            notes: "n".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().to_path_buf()).await.unwrap();
        let stored = item("owner-1", "example.com");

        store.put(&stored).await.unwrap();

        assert_eq!(store.get(stored.id).await.unwrap(), Some(stored));
        assert_eq!(store.get(ItemId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().to_path_buf()).await.unwrap();
        let stored = item("owner-1", "example.com");

        store.put(&stored).await.unwrap();
        assert!(store.delete(stored.id).await.unwrap());
        assert!(!store.delete(stored.id).await.unwrap());
        assert_eq!(store.get(stored.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let first = item("owner-1", "a.com");
        let second = item("owner-1", "b.com");
        let foreign = item("owner-2", "c.com");

        {
            let store = JsonFileStore::open(temp_dir.path().to_path_buf()).await.unwrap();
            for stored in [&first, &foreign, &second] {
                store.put(stored).await.unwrap();
            }
        }

        {
            let store = JsonFileStore::open(temp_dir.path().to_path_buf()).await.unwrap();
            let listed = store.list_by_owner("owner-1").await.unwrap();
            assert_eq!(listed, vec![first, second]);
        }
    }

    #[tokio::test]
    async fn test_envelope_stored_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().to_path_buf()).await.unwrap();
        let stored = item("owner-1", "a.com");
        store.put(&stored).await.unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("vault.json")).unwrap();
        assert!(raw.contains("\"password\": \"bm9uY2U=:Y2lwaGVy\""));
        assert!(!temp_dir.path().join("vault.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_put_leaves_cache_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let storage_dir = temp_dir.path().join("store");
        let store = JsonFileStore::open(storage_dir.clone()).await.unwrap();
        let kept = item("owner-1", "a.com");
        store.put(&kept).await.unwrap();

        std::fs::remove_dir_all(&storage_dir).unwrap();
        let lost = item("owner-1", "b.com");

        assert!(store.put(&lost).await.is_err());
        assert_eq!(store.get(lost.id).await.unwrap(), None);
        assert_eq!(store.list_by_owner("owner-1").await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_item() {
        let temp_dir = TempDir::new().unwrap();
        let storage_dir = temp_dir.path().join("store");
        let store = JsonFileStore::open(storage_dir.clone()).await.unwrap();
        let stored = item("owner-1", "a.com");
        store.put(&stored).await.unwrap();

        std::fs::remove_dir_all(&storage_dir).unwrap();

        assert!(store.delete(stored.id).await.is_err());
        assert_eq!(store.get(stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_rejects_unknown_version() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("vault.json"),
            r#"{"version": 99, "items": []}"#,
        )
        .unwrap();

        let result = JsonFileStore::open(temp_dir.path().to_path_buf()).await;
        assert!(matches!(result, Err(VaultError::StorageError(_))));
    }
}
