//! Cryptographic primitives for client-side credential encryption
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation
//! - AES-256-GCM envelopes with a base64 text form
//! - The credential codec tying both to an owner identifier
//! - Secure memory handling with zeroize

mod codec;
mod envelope;
mod key_derivation;
mod secure_memory;

pub use codec::{decrypt_from_storage, encrypt_for_storage, FIXED_CONTEXT};
pub use envelope::{open, seal, Envelope, NONCE_LEN, TAG_LEN};
pub use key_derivation::{derive_key, PBKDF2_ITERATIONS};
pub use secure_memory::{KeyMaterial, SecretString, KEY_LEN};
