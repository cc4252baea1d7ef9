//! Configuration file.
//!
//! Settings that belong to the installation rather than to a trip (API key,
//! endpoint, voice, logging) live in an INI file:
//!
//! ```ini
//! [directions]
//! api_key = ...
//! base_url = https://maps.googleapis.com/maps/api/directions/json
//! language = zh-CN
//! timeout_secs = 15
//! proxy = http://127.0.0.1:7890
//!
//! [voice]
//! language = zh-CN
//! pitch = 1
//! rate = 0.8
//!
//! [logging]
//! level = info
//! file = /var/log/navtrack.log
//!
//! [settings]
//! path = /home/me/.config/navtrack/settings.json
//! ```
//!
//! Missing keys take their defaults. The `NAVTRACK_API_KEY` environment
//! variable overrides `directions.api_key`.

mod keys;

pub use keys::ConfigKey;

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::directions::{DirectionsConfig, DEFAULT_DIRECTIONS_URL};
use crate::instruction::Language;
use crate::voice::{SpeechOptions, DEFAULT_PITCH, DEFAULT_RATE};

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "NAVTRACK_API_KEY";

/// Default directions timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Errors from loading, saving or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `[directions]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsSection {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: Language,
    pub timeout_secs: u64,
    pub proxy: Option<String>,
}

impl Default for DirectionsSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            language: Language::Chinese,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
        }
    }
}

/// `[voice]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSection {
    pub language: Language,
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceSection {
    fn default() -> Self {
        Self {
            language: Language::Chinese,
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSection {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// `[settings]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSection {
    /// Navigation settings store; defaults to `settings.json` beside the INI.
    pub path: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub directions: DirectionsSection,
    pub voice: VoiceSection,
    pub logging: LoggingSection,
    pub settings: SettingsSection,
}

impl ConfigFile {
    /// Loads from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Builds a config from parsed INI data.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Renders as INI. Unset optional keys are omitted.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Saves to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// API key after applying the environment override.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.directions.api_key.clone())
    }

    /// Directions transport settings.
    pub fn directions_config(&self) -> DirectionsConfig {
        DirectionsConfig {
            base_url: self.directions.base_url.clone(),
            api_key: self.api_key(),
            timeout: Duration::from_secs(self.directions.timeout_secs),
            proxy: self.directions.proxy.clone(),
        }
    }

    /// Voice parameters.
    pub fn speech_options(&self) -> SpeechOptions {
        SpeechOptions::for_language(self.voice.language)
            .with_pitch(self.voice.pitch)
            .with_rate(self.voice.rate)
    }

    /// Navigation settings store location.
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .path
            .clone()
            .unwrap_or_else(default_settings_path)
    }
}

/// Picks the environment key when set and non-blank, else the file key.
fn resolve_api_key(env: Option<String>, file: Option<String>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or(file)
        .filter(|k| !k.trim().is_empty())
}

/// Directory holding navtrack's configuration.
///
/// `<config dir>/navtrack` where the platform has one, `~/.navtrack`
/// otherwise.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("navtrack"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".navtrack")))
        .unwrap_or_else(|| PathBuf::from(".navtrack"))
}

/// Default configuration file path.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

/// Default navigation settings store path.
pub fn default_settings_path() -> PathBuf {
    config_dir().join("settings.json")
}
