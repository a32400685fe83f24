//! AES-256-GCM envelope
//!
//! Text format: `{base64(nonce)}:{base64(ciphertext || tag)}`
//! - Nonce: 12 bytes (96 bits), fresh per seal
//! - Tag: 16 bytes (128 bits), appended to the ciphertext as aes-gcm emits it
//!
//! Standard base64 never produces `:`, so exactly one delimiter separates the
//! two segments.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use super::KeyMaterial;
use crate::error::{Result, VaultError};

/// Nonce length in bytes (96 bits - standard for GCM)
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes
pub const TAG_LEN: usize = 16;

const DELIMITER: char = ':';

/// One sealed secret: nonce plus AEAD output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// The nonce this envelope was sealed with
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Encode to the transportable text form
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Parse the text form, rejecting anything that is not exactly
    /// `nonce:ciphertext` with valid base64 on both sides.
    pub fn deserialize(s: &str) -> Result<Self> {
        let mut parts = s.split(DELIMITER);
        let (nonce_b64, ciphertext_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(nonce), Some(ciphertext), None) => (nonce, ciphertext),
            _ => {
                return Err(VaultError::Format(
                    "expected exactly one ':' between nonce and ciphertext".to_string(),
                ))
            }
        };

        let nonce_bytes = STANDARD
            .decode(nonce_b64)
            .map_err(|e| VaultError::Format(format!("invalid nonce base64: {}", e)))?;
        let ciphertext = STANDARD
            .decode(ciphertext_b64)
            .map_err(|e| VaultError::Format(format!("invalid ciphertext base64: {}", e)))?;

        let nonce: [u8; NONCE_LEN] = nonce_bytes.as_slice().try_into().map_err(|_| {
            VaultError::Format(format!(
                "invalid nonce length: expected {}, got {}",
                NONCE_LEN,
                nonce_bytes.len()
            ))
        })?;

        if ciphertext.len() < TAG_LEN {
            return Err(VaultError::Format(format!(
                "ciphertext shorter than the {}-byte tag",
                TAG_LEN
            )));
        }

        Ok(Self { nonce, ciphertext })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            STANDARD.encode(self.nonce),
            DELIMITER,
            STANDARD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for Envelope {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::deserialize(s)
    }
}

/// Encrypt `plaintext` under `key` with a freshly drawn nonce and no AAD.
///
/// Sealing the same plaintext twice gives two different envelopes.
pub fn seal(plaintext: &[u8], key: &KeyMaterial) -> Result<Envelope> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    // Never cache this: a repeated nonce under one key breaks GCM.
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    Ok(Envelope { nonce, ciphertext })
}

/// Decrypt and authenticate an envelope.
///
/// Fails closed: any tag mismatch yields [`VaultError::Integrity`] and no
/// plaintext at all.
pub fn open(envelope: &Envelope, key: &KeyMaterial) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::Integrity)?;

    cipher
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
        .map_err(|_| VaultError::Integrity)
}
