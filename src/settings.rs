//! User settings persistence
//!
//! Two durable keys in the state directory: `vibe-settings` (JSON: mood key,
//! volume, audio-only flag) and `vibe-volume` (plain integer string, written
//! eagerly on slider changes even before the player is ready). No schema
//! version; absent or malformed values fall back to defaults.

use crate::catalog;
use crate::config::ConfigManager;
use crate::error::{VibesError, VibesResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// The full settings object, serialized on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Selected mood key
    pub mood: String,
    /// Volume 0-100
    pub volume: u8,
    /// Audio-only mode
    pub audio_only: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            mood: catalog::DEFAULT_MOOD.to_string(),
            volume: 50,
            audio_only: false,
        }
    }
}

/// Reads and writes the settings files
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Store rooted at the default state directory
    pub fn new() -> Self {
        Self {
            dir: ConfigManager::state_dir(),
        }
    }

    /// Store rooted at a specific directory (tests)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join("vibe-settings")
    }

    fn volume_path(&self) -> PathBuf {
        self.dir.join("vibe-volume")
    }

    /// Load settings, falling back to defaults when the file is absent or
    /// malformed. An unknown persisted mood key is replaced with the
    /// default mood.
    pub async fn load(&self) -> UserSettings {
        let path = self.settings_path();
        let content = match fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(_) => {
                debug!("No persisted settings, using defaults");
                return UserSettings::default();
            }
        };

        let mut settings: UserSettings = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!("Persisted settings malformed ({e}), using defaults");
                return UserSettings::default();
            }
        };

        if catalog::resolve(&settings.mood).is_none() {
            warn!("Persisted mood '{}' unknown, using default", settings.mood);
            settings.mood = catalog::DEFAULT_MOOD.to_string();
        }
        settings.volume = settings.volume.min(100);

        settings
    }

    /// Serialize and store the full settings object.
    pub async fn save(&self, settings: &UserSettings) -> VibesResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| VibesError::io("creating state directory", e))?;

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), content)
            .await
            .map_err(|e| VibesError::io("writing vibe-settings", e))?;

        Ok(())
    }

    /// Load the eagerly-persisted volume, if any.
    pub async fn load_volume(&self) -> Option<u8> {
        let content = fs::read_to_string(self.volume_path()).await.ok()?;
        match content.trim().parse::<u8>() {
            Ok(v) => Some(v.min(100)),
            Err(_) => {
                warn!("Persisted volume malformed, ignoring");
                None
            }
        }
    }

    /// Persist the volume as a plain integer string.
    pub async fn save_volume(&self, volume: u8) -> VibesResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| VibesError::io("creating state directory", e))?;

        fs::write(self.volume_path(), volume.to_string())
            .await
            .map_err(|e| VibesError::io("writing vibe-volume", e))
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_defaults_when_absent() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());

        let settings = store.load().await;
        assert_eq!(settings, UserSettings::default());
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());

        let settings = UserSettings {
            mood: "jazz".to_string(),
            volume: 80,
            audio_only: true,
        };
        store.save(&settings).await.unwrap();

        assert_eq!(store.load().await, settings);
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());
        tokio::fs::write(temp.path().join("vibe-settings"), "{not json")
            .await
            .unwrap();

        assert_eq!(store.load().await, UserSettings::default());
    }

    #[tokio::test]
    async fn unknown_mood_replaced_with_default() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());
        tokio::fs::write(
            temp.path().join("vibe-settings"),
            r#"{"mood":"vaporwave","volume":30,"audio_only":false}"#,
        )
        .await
        .unwrap();

        let settings = store.load().await;
        assert_eq!(settings.mood, catalog::DEFAULT_MOOD);
        assert_eq!(settings.volume, 30);
    }

    #[tokio::test]
    async fn volume_roundtrip_and_clamp() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());

        store.save_volume(70).await.unwrap();
        assert_eq!(store.load_volume().await, Some(70));

        tokio::fs::write(temp.path().join("vibe-volume"), "250")
            .await
            .unwrap();
        assert_eq!(store.load_volume().await, Some(100)); // clamped
    }

    #[tokio::test]
    async fn malformed_volume_ignored() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::with_dir(temp.path().to_path_buf());
        tokio::fs::write(temp.path().join("vibe-volume"), "loud")
            .await
            .unwrap();

        assert_eq!(store.load_volume().await, None);
    }
}
