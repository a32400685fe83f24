//! Credential codec: what gets persisted for a secret, and how it comes back
//!
//! The key for an item is derived from the owner's account identifier with a
//! fixed salt. The identifier is not secret, so this only keeps secrets away
//! from a reader of the database who does not also know which account an
//! item belongs to.

use tracing::debug;

use super::envelope::{open, seal, Envelope};
use super::key_derivation::derive_key;
use super::SecretString;
use crate::error::{DecryptionFailure, Result, VaultError};

/// Domain-separation salt for every derived key. Changing it makes all
/// existing envelopes unreadable.
pub const FIXED_CONTEXT: &str = "vault_salt";

/// Encrypt a plaintext secret and return the exact string to persist.
pub fn encrypt_for_storage(secret_plaintext: &str, owner_key_input: &str) -> Result<String> {
    let key = derive_key(owner_key_input, FIXED_CONTEXT);
    let envelope = seal(secret_plaintext.as_bytes(), &key)?;
    Ok(envelope.serialize())
}

/// Decrypt a persisted envelope string back into the plaintext secret.
pub fn decrypt_from_storage(
    serialized_envelope: &str,
    owner_key_input: &str,
) -> std::result::Result<SecretString, DecryptionFailure> {
    let envelope = Envelope::deserialize(serialized_envelope).map_err(|e| {
        debug!("Rejected stored envelope: {}", e);
        DecryptionFailure::Format
    })?;

    let key = derive_key(owner_key_input, FIXED_CONTEXT);
    let plaintext = open(&envelope, &key).map_err(|e| match e {
        VaultError::Integrity => DecryptionFailure::Integrity,
        _ => DecryptionFailure::Format,
    })?;

    String::from_utf8(plaintext)
        .map(SecretString::new)
        .map_err(|_| DecryptionFailure::Format)
}
