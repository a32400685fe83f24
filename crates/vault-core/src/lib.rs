//! # vault-core
//!
//! Client-side core of a password vault:
//! - PBKDF2-HMAC-SHA256 key derivation from the owner's identifier
//! - AES-256-GCM envelopes in a `nonce:ciphertext` base64 text form
//! - Owner-scoped credential storage with per-item decryption on listing
//! - Password strength hints and a CSPRNG password generator
//! - Clipboard exposure that clears copied secrets after a timeout

pub mod clipboard;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod settings;
pub mod storage;
pub mod strength;

pub use clipboard::{Clipboard, ClipboardExposureController, ExposureState, MemoryClipboard};
pub use credential::{CredentialInput, ItemId, StoredItem, VaultEntry, VaultManager};
pub use crypto::{decrypt_from_storage, encrypt_for_storage, Envelope, KeyMaterial, SecretString};
pub use error::{DecryptionFailure, Result, VaultError};
pub use generator::{generate, CharClass};
pub use settings::{GeneratorSettings, Settings, SettingsManager};
pub use storage::{JsonFileStore, MemoryStore, VaultStore};
pub use strength::{score, StrengthLabel};
