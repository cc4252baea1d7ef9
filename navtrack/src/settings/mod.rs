//! Navigation settings persistence.
//!
//! Settings live in a single record under one key of a [`SettingsStore`].
//! The record is loaded once when a session opens and written back on every
//! change (write-through, no batching).
//!
//! ```ignore
//! use navtrack::settings::{FileSettingsStore, SettingsRepository, SettingUpdate};
//!
//! let repo = SettingsRepository::new(Arc::new(FileSettingsStore::new(path)));
//! let settings = repo.load_or_default();
//! let settings = repo.update(settings, SettingUpdate::VoiceEnabled(false))?;
//! ```

mod store;
mod types;

pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use types::{NavigationMode, NavigationSettings, SettingKey, SettingUpdate};

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Store key holding the serialized [`NavigationSettings`].
pub const SETTINGS_KEY: &str = "navigationSettings";

/// Errors from settings parsing and persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the backing file failed.
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("Settings file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The stored record could not be (de)serialized.
    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No setting with this name.
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    /// The value does not fit the setting's type.
    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Loads and saves [`NavigationSettings`] through an injected store.
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for SettingsRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRepository").finish_non_exhaustive()
    }
}

impl SettingsRepository {
    /// Wraps a store.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Loads the stored settings; `Ok(None)` if nothing was saved yet.
    pub fn load(&self) -> Result<Option<NavigationSettings>, SettingsError> {
        match self.store.get(SETTINGS_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Loads the stored settings, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> NavigationSettings {
        match self.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => NavigationSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                NavigationSettings::default()
            }
        }
    }

    /// Persists `settings`.
    pub fn save(&self, settings: &NavigationSettings) -> Result<(), SettingsError> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &json)
    }

    /// Applies `update` and persists the result, returning the new value.
    pub fn update(
        &self,
        settings: NavigationSettings,
        update: SettingUpdate,
    ) -> Result<NavigationSettings, SettingsError> {
        let updated = settings.with_update(update);
        self.save(&updated)?;
        Ok(updated)
    }
}
