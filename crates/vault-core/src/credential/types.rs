//! Credential type definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::SecretString;
use crate::error::{DecryptionFailure, Result, VaultError};

/// Opaque identifier of a stored vault item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// A fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// What the user types into the entry form
#[derive(Debug)]
pub struct CredentialInput {
    /// Site the credential is for (e.g. "facebook.com")
    pub website: String,
    /// Account name or email on that site
    pub username: String,
    /// Plaintext password; only ever persisted as an envelope
    pub password: SecretString,
    /// Free-form notes, stored in clear text
    pub notes: String,
}

impl CredentialInput {
    /// Build an input from borrowed fields
    pub fn new(website: &str, username: &str, password: &str, notes: &str) -> Self {
        Self {
            website: website.to_string(),
            username: username.to_string(),
            password: SecretString::new(password.to_string()),
            notes: notes.to_string(),
        }
    }

    /// Website, username and password are required
    pub fn validate(&self) -> Result<()> {
        if self.website.trim().is_empty() {
            return Err(VaultError::MissingField("website"));
        }
        if self.username.trim().is_empty() {
            return Err(VaultError::MissingField("username"));
        }
        if self.password.expose().is_empty() {
            return Err(VaultError::MissingField("password"));
        }
        Ok(())
    }
}

/// A vault item as it sits in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    /// Unique identifier
    pub id: ItemId,

    /// Owner account identifier; also the key-derivation input
    pub user_id: String,

    /// Site the credential is for
    pub website: String,

    /// Account name on that site
    pub username: String,

    /// Serialized envelope of the password (`nonce:ciphertext`)
    pub password: String,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Last full replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A listed item with its password decrypted, or the reason it could not be
#[derive(Debug)]
pub struct VaultEntry {
    /// Unique identifier
    pub id: ItemId,
    /// Site the credential is for
    pub website: String,
    /// Account name on that site
    pub username: String,
    /// Free-form notes
    pub notes: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last full replacement
    pub updated_at: Option<DateTime<Utc>>,
    /// Decrypted password, or a per-item failure marker
    pub password: std::result::Result<SecretString, DecryptionFailure>,
}

impl VaultEntry {
    /// Pair stored metadata with a decryption outcome
    pub fn new(
        item: StoredItem,
        password: std::result::Result<SecretString, DecryptionFailure>,
    ) -> Self {
        Self {
            id: item.id,
            website: item.website,
            username: item.username,
            notes: item.notes,
            created_at: item.created_at,
            updated_at: item.updated_at,
            password,
        }
    }

    /// Whether the password could be decrypted
    pub fn is_decrypted(&self) -> bool {
        self.password.is_ok()
    }

    /// Case-insensitive search over website, username and notes.
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        [&self.website, &self.username, &self.notes]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Keep the entries matching `query`, preserving order
pub fn filter_entries<'a>(entries: &'a [VaultEntry], query: &str) -> Vec<&'a VaultEntry> {
    entries.iter().filter(|entry| entry.matches(query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(website: &str, username: &str, notes: &str) -> VaultEntry {
        VaultEntry {
            id: ItemId::new(),
            website: website.to_string(),
            username: username.to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
            updated_at: None,
            password: Err(DecryptionFailure::Integrity),
        }
    }

    #[test]
    fn test_item_id_roundtrip_text() {
        let id = ItemId::new();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(CredentialInput::new("site", "me", "pw", "").validate().is_ok());
        assert!(matches!(
            CredentialInput::new(" ", "me", "pw", "").validate(),
            Err(VaultError::MissingField("website"))
        ));
        assert!(matches!(
            CredentialInput::new("site", "", "pw", "").validate(),
            Err(VaultError::MissingField("username"))
        ));
        assert!(matches!(
            CredentialInput::new("site", "me", "", "").validate(),
            Err(VaultError::MissingField("password"))
        ));
    }

    #[test]
    fn test_input_debug_hides_password() {
        let input = CredentialInput::new("site", "me", "hunter2", "");
        assert!(!format!("{:?}", input).contains("hunter2"));
    }

    #[test]
    fn test_stored_item_document_layout() {
        let item = StoredItem {
            id: ItemId::new(),
            user_id: "owner-1".to_string(),
            website: "example.com".to_string(),
            username: "me".to_string(),
            password: "bm9uY2U=:Y2lwaGVy".to_string(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["userId"], "owner-1");
        assert_eq!(json["password"], "bm9uY2U=:Y2lwaGVy");
        assert!(json.get("updatedAt").is_none());

        let parsed: StoredItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_search() {
        let entries = vec![
            entry("GitHub.com", "octo", ""),
            entry("mail.example", "me@example.com", "work account"),
            entry("bank", "jdoe", "joint with Sam"),
        ];

        assert_eq!(filter_entries(&entries, "").len(), 3);
        assert_eq!(filter_entries(&entries, "github")[0].username, "octo");
        assert_eq!(filter_entries(&entries, "EXAMPLE").len(), 1);
        assert_eq!(filter_entries(&entries, "sam")[0].website, "bank");
        assert!(filter_entries(&entries, "nothing").is_empty());
    }
}
