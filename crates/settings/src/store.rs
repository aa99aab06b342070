//! Settings file and change notification.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::SettingsError;

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Game installation root. Empty until the user configures it.
    #[serde(default)]
    pub game_directory: String,
}

/// Settings bound to a file on disk.
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
    game_directory_tx: watch::Sender<String>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        let settings = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        tracing::info!(
            path = %path.display(),
            game_directory = %settings.game_directory,
            "settings loaded"
        );

        let (game_directory_tx, _) = watch::channel(settings.game_directory.clone());
        Ok(Self {
            path,
            settings,
            game_directory_tx,
        })
    }

    /// Loads settings from the platform default location.
    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load(settings_path())
    }

    /// Writes the current settings to disk.
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Re-reads the file and applies its game directory, notifying
    /// subscribers if it changed. A missing file leaves settings as they are.
    pub fn reload(&mut self) -> Result<bool, SettingsError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let loaded: Settings = toml::from_str(&content)?;
        Ok(self.set_game_directory(loaded.game_directory))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game_directory(&self) -> &str {
        &self.settings.game_directory
    }

    /// Updates the game directory. Subscribers are only notified when the
    /// value actually changes. Returns whether it changed.
    pub fn set_game_directory(&mut self, dir: impl Into<String>) -> bool {
        let dir = dir.into();
        if self.settings.game_directory == dir {
            return false;
        }

        tracing::info!(game_directory = %dir, "game directory changed");
        self.settings.game_directory.clone_from(&dir);
        self.game_directory_tx.send_replace(dir);
        true
    }

    /// Restores defaults, saves them and notifies subscribers.
    pub fn reset_to_defaults(&mut self) -> Result<(), SettingsError> {
        tracing::info!("resetting settings to defaults");
        self.settings = Settings::default();
        self.save()?;
        self.game_directory_tx
            .send_replace(self.settings.game_directory.clone());
        Ok(())
    }

    /// Returns a receiver that observes game directory changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.game_directory_tx.subscribe()
    }
}

/// Returns `true` if `path` names an existing, readable directory.
pub fn is_valid_game_directory(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let path = Path::new(path);
    path.is_dir() && std::fs::read_dir(path).is_ok()
}

/// Returns the platform-specific settings file path.
pub fn settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("logi").join("settings.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("logi")
            .join("settings.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(tmp.path().join("settings.toml")).unwrap();
        assert_eq!(store.game_directory(), "");
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.toml");

        let mut store = SettingsStore::load(&path).unwrap();
        store.set_game_directory("/games/StarCitizen");
        store.save().unwrap();

        let loaded = SettingsStore::load(&path).unwrap();
        assert_eq!(loaded.game_directory(), "/games/StarCitizen");
    }

    #[test]
    fn unknown_keys_and_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let store = SettingsStore::load(&path).unwrap();
        assert_eq!(store.game_directory(), "");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "game_directory = [").unwrap();

        assert!(matches!(
            SettingsStore::load(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn set_same_directory_does_not_notify() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::load(tmp.path().join("settings.toml")).unwrap();
        let mut rx = store.subscribe();

        assert!(!store.set_game_directory(""));
        assert!(!rx.has_changed().unwrap());

        assert!(store.set_game_directory("/sc"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "/sc");

        assert!(!store.set_game_directory("/sc"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn reset_notifies_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        let mut store = SettingsStore::load(&path).unwrap();
        store.set_game_directory("/sc");
        let mut rx = store.subscribe();

        store.reset_to_defaults().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "");
        assert!(path.exists());
        assert_eq!(SettingsStore::load(&path).unwrap().game_directory(), "");
    }

    #[test]
    fn reload_picks_up_external_edit() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.toml");
        let mut store = SettingsStore::load(&path).unwrap();
        let mut rx = store.subscribe();

        assert!(!store.reload().unwrap());

        std::fs::write(&path, "game_directory = \"/sc\"\n").unwrap();
        assert!(store.reload().unwrap());
        assert_eq!(store.game_directory(), "/sc");
        assert_eq!(*rx.borrow_and_update(), "/sc");

        assert!(!store.reload().unwrap());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn valid_game_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(is_valid_game_directory(tmp.path().to_str().unwrap()));
        assert!(!is_valid_game_directory(""));

        let file = tmp.path().join("file.txt");
        std::fs::write(&file, "").unwrap();
        assert!(!is_valid_game_directory(file.to_str().unwrap()));
        assert!(!is_valid_game_directory(
            tmp.path().join("missing").to_str().unwrap()
        ));
    }

    #[test]
    fn settings_path_mentions_logi() {
        assert!(settings_path().to_string_lossy().contains("logi"));
    }
}
