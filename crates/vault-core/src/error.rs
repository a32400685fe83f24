//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
///
/// Messages never carry plaintext secrets or key bytes.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Malformed envelope: {0}")]
    Format(String),

    #[error("Integrity check failed - wrong key or corrupted ciphertext")]
    Integrity,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("No characters left to generate from - select at least one character set")]
    EmptyAlphabet,

    #[error("Invalid password length: {0}")]
    InvalidLength(usize),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Vault item not found: {0}")]
    ItemNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Per-item decryption outcome surfaced to the UI as "could not decrypt".
///
/// Kept separate from [`VaultError`] so a batch listing can carry one per
/// entry without aborting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptionFailure {
    #[error("could not decrypt: malformed envelope")]
    Format,

    #[error("could not decrypt: integrity check failed")]
    Integrity,

    #[error("could not decrypt: decryption task did not complete")]
    Interrupted,
}
