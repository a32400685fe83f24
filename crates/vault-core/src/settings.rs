//! Application settings management
//!
//! Stores non-sensitive preferences in a plain JSON file. Nothing here
//! affects how envelopes are sealed; key derivation parameters are fixed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::generator::CharClass;

/// Default seconds a copied secret stays on the clipboard
pub const DEFAULT_CLIPBOARD_CLEAR_SECS: u64 = 12;

/// Password generator preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// Generated password length
    pub length: usize,
    /// Include `a-z`
    pub lowercase: bool,
    /// Include `A-Z`
    pub uppercase: bool,
    /// Include `0-9`
    pub digits: bool,
    /// Include punctuation symbols
    pub symbols: bool,
    /// Drop `0 O I l 1` from the alphabet
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            length: 12,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl GeneratorSettings {
    /// The character classes switched on
    pub fn classes(&self) -> Vec<CharClass> {
        [
            (self.lowercase, CharClass::Lower),
            (self.uppercase, CharClass::Upper),
            (self.digits, CharClass::Digit),
            (self.symbols, CharClass::Symbol),
        ]
        .into_iter()
        .filter_map(|(enabled, class)| enabled.then_some(class))
        .collect()
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Seconds before a copied secret is wiped from the clipboard
    pub clipboard_clear_secs: u64,
    /// Password generator preferences
    pub generator: GeneratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            clipboard_clear_secs: DEFAULT_CLIPBOARD_CLEAR_SECS,
            generator: GeneratorSettings::default(),
        }
    }
}

impl Settings {
    /// Clipboard exposure window as a duration
    pub fn clipboard_clear_after(&self) -> Duration {
        Duration::from_secs(self.clipboard_clear_secs)
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(storage_dir: &Path) -> Self {
        let settings_file = storage_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_default();

        Self {
            settings_file,
            settings,
        }
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub async fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save().await
    }

    /// Update generator preferences and save
    pub async fn update_generator(&mut self, generator: GeneratorSettings) -> Result<()> {
        self.settings.generator = generator;
        self.save().await
    }

    /// Set the clipboard exposure window and save
    pub async fn set_clipboard_clear_secs(&mut self, secs: u64) -> Result<()> {
        self.settings.clipboard_clear_secs = secs;
        self.save().await
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file)
                .await
                .map_err(|e| VaultError::StorageError(e.to_string()))?;
        }

        Ok(())
    }
}
