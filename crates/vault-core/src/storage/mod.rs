//! Storage backends for vault items
//!
//! This module provides two storage backends:
//! 1. In-memory (tests and ephemeral sessions)
//! 2. JSON file in the user's data directory

mod traits;
mod memory;
mod json_file;

pub use traits::VaultStore;
pub use memory::MemoryStore;
pub use json_file::JsonFileStore;
