//! Typed access to individual configuration keys.
//!
//! Keys are addressed as `section.key`, e.g. `directions.api_key`. Every key
//! knows how to read its value from a [`ConfigFile`] as a string and how to
//! parse and store a new one; the INI loader reuses the same parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::instruction::Language;

/// A settable configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    DirectionsApiKey,
    DirectionsBaseUrl,
    DirectionsLanguage,
    DirectionsTimeoutSecs,
    DirectionsProxy,
    VoiceLanguage,
    VoicePitch,
    VoiceRate,
    LoggingLevel,
    LoggingFile,
    SettingsPath,
}

const ALL_KEYS: [ConfigKey; 11] = [
    ConfigKey::DirectionsApiKey,
    ConfigKey::DirectionsBaseUrl,
    ConfigKey::DirectionsLanguage,
    ConfigKey::DirectionsTimeoutSecs,
    ConfigKey::DirectionsProxy,
    ConfigKey::VoiceLanguage,
    ConfigKey::VoicePitch,
    ConfigKey::VoiceRate,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingFile,
    ConfigKey::SettingsPath,
];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::DirectionsApiKey
            | ConfigKey::DirectionsBaseUrl
            | ConfigKey::DirectionsLanguage
            | ConfigKey::DirectionsTimeoutSecs
            | ConfigKey::DirectionsProxy => "directions",
            ConfigKey::VoiceLanguage | ConfigKey::VoicePitch | ConfigKey::VoiceRate => "voice",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
            ConfigKey::SettingsPath => "settings",
        }
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::DirectionsApiKey => "api_key",
            ConfigKey::DirectionsBaseUrl => "base_url",
            ConfigKey::DirectionsLanguage | ConfigKey::VoiceLanguage => "language",
            ConfigKey::DirectionsTimeoutSecs => "timeout_secs",
            ConfigKey::DirectionsProxy => "proxy",
            ConfigKey::VoicePitch => "pitch",
            ConfigKey::VoiceRate => "rate",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
            ConfigKey::SettingsPath => "path",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        match self {
            ConfigKey::DirectionsApiKey => config.directions.api_key.clone().unwrap_or_default(),
            ConfigKey::DirectionsBaseUrl => config.directions.base_url.clone(),
            ConfigKey::DirectionsLanguage => config.directions.language.tag().to_string(),
            ConfigKey::DirectionsTimeoutSecs => config.directions.timeout_secs.to_string(),
            ConfigKey::DirectionsProxy => config.directions.proxy.clone().unwrap_or_default(),
            ConfigKey::VoiceLanguage => config.voice.language.tag().to_string(),
            ConfigKey::VoicePitch => config.voice.pitch.to_string(),
            ConfigKey::VoiceRate => config.voice.rate.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => path(&config.logging.file),
            ConfigKey::SettingsPath => path(&config.settings.path),
        }
    }

    /// Parses `value` and stores it. Empty clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match self {
            ConfigKey::DirectionsApiKey => config.directions.api_key = optional(value),
            ConfigKey::DirectionsBaseUrl => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(self.invalid(value, "expected an http(s) URL"));
                }
                config.directions.base_url = value.to_string();
            }
            ConfigKey::DirectionsLanguage => config.directions.language = self.language(value)?,
            ConfigKey::DirectionsTimeoutSecs => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| self.invalid(value, "expected whole seconds"))?;
                if secs == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.directions.timeout_secs = secs;
            }
            ConfigKey::DirectionsProxy => config.directions.proxy = optional(value),
            ConfigKey::VoiceLanguage => config.voice.language = self.language(value)?,
            ConfigKey::VoicePitch => config.voice.pitch = self.multiplier(value)?,
            ConfigKey::VoiceRate => config.voice.rate = self.multiplier(value)?,
            ConfigKey::LoggingLevel => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingFile => config.logging.file = optional(value).map(PathBuf::from),
            ConfigKey::SettingsPath => config.settings.path = optional(value).map(PathBuf::from),
        }
        Ok(())
    }

    fn language(&self, value: &str) -> Result<Language, ConfigError> {
        Language::from_tag(value).ok_or_else(|| self.invalid(value, "unsupported language"))
    }

    fn multiplier(&self, value: &str) -> Result<f32, ConfigError> {
        match value.parse::<f32>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(self.invalid(value, "expected a positive number")),
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
