//! Vault manager for CRUD operations
//!
//! Passwords are sealed before they reach the store and opened only after
//! they come back. Key derivation is deliberately slow, so each seal/open
//! runs on a blocking worker.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::types::{CredentialInput, ItemId, StoredItem, VaultEntry};
use crate::crypto::{decrypt_from_storage, encrypt_for_storage, SecretString};
use crate::error::{DecryptionFailure, Result, VaultError};
use crate::storage::VaultStore;

/// Owner-scoped credential operations over a storage backend
pub struct VaultManager {
    /// Storage backend
    store: Arc<dyn VaultStore>,
}

impl VaultManager {
    /// Create a new vault manager
    pub fn new(store: Arc<dyn VaultStore>) -> Self {
        Self { store }
    }

    /// Encrypt and store a new credential for `owner`
    pub async fn add(&self, owner: &str, input: CredentialInput) -> Result<StoredItem> {
        validate_owner(owner)?;
        input.validate()?;

        let item = StoredItem {
            id: ItemId::new(),
            user_id: owner.to_string(),
            website: input.website,
            username: input.username,
            password: seal_password(input.password, owner).await?,
            notes: input.notes,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        self.store.put(&item).await?;

        info!("Added vault item: {}", item.id);
        Ok(item)
    }

    /// Replace every field of an existing credential, re-sealing the password
    /// under a fresh nonce
    pub async fn update(
        &self,
        owner: &str,
        id: ItemId,
        input: CredentialInput,
    ) -> Result<StoredItem> {
        validate_owner(owner)?;
        input.validate()?;

        let mut item = self.owned_item(owner, id).await?;

        item.password = seal_password(input.password, owner).await?;
        item.website = input.website;
        item.username = input.username;
        item.notes = input.notes;
        item.updated_at = Some(chrono::Utc::now());

        self.store.put(&item).await?;

        info!("Updated vault item: {}", id);
        Ok(item)
    }

    /// Delete a credential
    pub async fn delete(&self, owner: &str, id: ItemId) -> Result<()> {
        self.owned_item(owner, id).await?;

        if !self.store.delete(id).await? {
            return Err(VaultError::ItemNotFound(id.to_string()));
        }

        info!("Deleted vault item: {}", id);
        Ok(())
    }

    /// Fetch and decrypt a single credential
    pub async fn get(&self, owner: &str, id: ItemId) -> Result<VaultEntry> {
        let item = self.owned_item(owner, id).await?;
        Ok(open_entry(item, owner.to_string()).await)
    }

    /// Fetch every credential of `owner`, decrypting each independently.
    ///
    /// Entries keep storage order. An item that cannot be decrypted is
    /// returned with a [`DecryptionFailure`] instead of failing the listing.
    pub async fn list(&self, owner: &str) -> Result<Vec<VaultEntry>> {
        let items = self.store.list_by_owner(owner).await?;
        let count = items.len();

        let entries = join_all(
            items
                .into_iter()
                .map(|item| open_entry(item, owner.to_string())),
        )
        .await;

        let failed = entries.iter().filter(|entry| !entry.is_decrypted()).count();
        debug!("Listed {} vault items, {} undecryptable", count, failed);
        Ok(entries)
    }

    /// Look up an item, hiding items that belong to someone else
    async fn owned_item(&self, owner: &str, id: ItemId) -> Result<StoredItem> {
        match self.store.get(id).await? {
            Some(item) if item.user_id == owner => Ok(item),
            _ => Err(VaultError::ItemNotFound(id.to_string())),
        }
    }
}

fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        return Err(VaultError::MissingField("owner"));
    }
    Ok(())
}

async fn seal_password(password: SecretString, owner: &str) -> Result<String> {
    let owner = owner.to_string();

    tokio::task::spawn_blocking(move || encrypt_for_storage(password.expose(), &owner))
        .await
        .map_err(|e| VaultError::Encryption(format!("encryption task failed: {}", e)))?
}

async fn open_entry(item: StoredItem, owner: String) -> VaultEntry {
    let envelope = item.password.clone();

    let password = tokio::task::spawn_blocking(move || decrypt_from_storage(&envelope, &owner))
        .await
        .unwrap_or(Err(DecryptionFailure::Interrupted));

    if let Err(failure) = &password {
        warn!("Vault item {}: {}", item.id, failure);
    }

    VaultEntry::new(item, password)
}
