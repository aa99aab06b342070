//! Persisted Logi settings.
//!
//! Settings are stored as TOML:
//! - Linux: `~/.config/logi/settings.toml`
//! - Windows: `%APPDATA%/logi/settings.toml`
//!
//! The game directory is published through a [`tokio::sync::watch`] channel
//! so the composing layer can re-resolve the game log when it changes.

mod error;
mod store;

pub use error::SettingsError;
pub use store::{Settings, SettingsStore, is_valid_game_directory, settings_path};
