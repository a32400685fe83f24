//! Passphrase-based key derivation using PBKDF2-HMAC-SHA256

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::secure_memory::{KeyMaterial, KEY_LEN};

/// PBKDF2 iteration count. Part of the on-disk format: envelopes sealed
/// under one count cannot be opened under another.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 256-bit key from `secret_input`, salted with the fixed `context`.
///
/// Deterministic: the same `(secret_input, context)` always yields the same
/// key, which is what lets a later session open envelopes without the key
/// ever being stored. An empty `secret_input` is accepted; entropy is the
/// caller's responsibility.
pub fn derive_key(secret_input: &str, context: &str) -> KeyMaterial {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        secret_input.as_bytes(),
        context.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );
    KeyMaterial::new(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "test-context";

    #[test]
    fn test_derive_key_length() {
        let key = derive_key("user-123", CONTEXT);
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key("user-123", CONTEXT);
        let key2 = derive_key("user-123", CONTEXT);

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_inputs() {
        let key1 = derive_key("user-123", CONTEXT);
        let key2 = derive_key("user-124", CONTEXT);

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_contexts() {
        let key1 = derive_key("user-123", "context-a");
        let key2 = derive_key("user-123", "context-b");

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_empty_input_is_deterministic() {
        let key1 = derive_key("", CONTEXT);
        let key2 = derive_key("", CONTEXT);

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), &[0u8; 32]);
    }
}
