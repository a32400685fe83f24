//! Website credentials: plaintext input, stored form, decrypted listing

mod manager;
mod types;

pub use manager::VaultManager;
pub use types::*;
