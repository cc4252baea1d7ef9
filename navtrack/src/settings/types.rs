//! Navigation settings record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SettingsError;

/// How the user is travelling; forwarded to the directions service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl NavigationMode {
    /// All modes in display order.
    pub const ALL: [NavigationMode; 4] = [
        NavigationMode::Driving,
        NavigationMode::Walking,
        NavigationMode::Bicycling,
        NavigationMode::Transit,
    ];

    /// Lowercase value used in directions queries.
    pub fn as_query(&self) -> &'static str {
        match self {
            NavigationMode::Driving => "driving",
            NavigationMode::Walking => "walking",
            NavigationMode::Bicycling => "bicycling",
            NavigationMode::Transit => "transit",
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for NavigationMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(NavigationMode::Driving),
            "walking" => Ok(NavigationMode::Walking),
            "bicycling" => Ok(NavigationMode::Bicycling),
            "transit" => Ok(NavigationMode::Transit),
            _ => Err(SettingsError::InvalidValue {
                key: SettingKey::NavigationMode.name().to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// User-facing navigation preferences.
///
/// Persisted as one JSON record; field names match the stored format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationSettings {
    /// Speak instructions aloud.
    pub voice_enabled: bool,
    /// Show the traffic layer on the map.
    pub show_traffic: bool,
    /// Reduce location polling when the battery is low.
    pub battery_optimization: bool,
    /// Travel mode for route requests.
    pub navigation_mode: NavigationMode,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            show_traffic: true,
            battery_optimization: true,
            navigation_mode: NavigationMode::Driving,
        }
    }
}

impl NavigationSettings {
    /// Returns a copy with one field replaced.
    pub fn with_update(self, update: SettingUpdate) -> Self {
        match update {
            SettingUpdate::VoiceEnabled(v) => Self {
                voice_enabled: v,
                ..self
            },
            SettingUpdate::ShowTraffic(v) => Self {
                show_traffic: v,
                ..self
            },
            SettingUpdate::BatteryOptimization(v) => Self {
                battery_optimization: v,
                ..self
            },
            SettingUpdate::NavigationMode(mode) => Self {
                navigation_mode: mode,
                ..self
            },
        }
    }

    /// Current value of one field as text.
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::VoiceEnabled => self.voice_enabled.to_string(),
            SettingKey::ShowTraffic => self.show_traffic.to_string(),
            SettingKey::BatteryOptimization => self.battery_optimization.to_string(),
            SettingKey::NavigationMode => self.navigation_mode.to_string(),
        }
    }
}

/// Names of the individual settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    VoiceEnabled,
    ShowTraffic,
    BatteryOptimization,
    NavigationMode,
}

impl SettingKey {
    /// All keys in display order.
    pub const ALL: [SettingKey; 4] = [
        SettingKey::VoiceEnabled,
        SettingKey::ShowTraffic,
        SettingKey::BatteryOptimization,
        SettingKey::NavigationMode,
    ];

    /// Name as stored in the settings record.
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::VoiceEnabled => "voiceEnabled",
            SettingKey::ShowTraffic => "showTraffic",
            SettingKey::BatteryOptimization => "batteryOptimization",
            SettingKey::NavigationMode => "navigationMode",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    /// Accepts the stored camelCase name or its snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// A typed change to one settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingUpdate {
    VoiceEnabled(bool),
    ShowTraffic(bool),
    BatteryOptimization(bool),
    NavigationMode(NavigationMode),
}

impl SettingUpdate {
    /// Parses a textual value for `key`.
    pub fn parse(key: SettingKey, value: &str) -> Result<Self, SettingsError> {
        let as_bool = || -> Result<bool, SettingsError> {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(true),
                "false" | "off" | "no" | "0" => Ok(false),
                _ => Err(SettingsError::InvalidValue {
                    key: key.name().to_string(),
                    value: value.to_string(),
                }),
            }
        };

        Ok(match key {
            SettingKey::VoiceEnabled => SettingUpdate::VoiceEnabled(as_bool()?),
            SettingKey::ShowTraffic => SettingUpdate::ShowTraffic(as_bool()?),
            SettingKey::BatteryOptimization => SettingUpdate::BatteryOptimization(as_bool()?),
            SettingKey::NavigationMode => SettingUpdate::NavigationMode(value.parse()?),
        })
    }

    /// The field this update changes.
    pub fn key(&self) -> SettingKey {
        match self {
            SettingUpdate::VoiceEnabled(_) => SettingKey::VoiceEnabled,
            SettingUpdate::ShowTraffic(_) => SettingKey::ShowTraffic,
            SettingUpdate::BatteryOptimization(_) => SettingKey::BatteryOptimization,
            SettingUpdate::NavigationMode(_) => SettingKey::NavigationMode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = NavigationSettings::default();
        assert!(settings.voice_enabled);
        assert!(settings.show_traffic);
        assert!(settings.battery_optimization);
        assert_eq!(settings.navigation_mode, NavigationMode::Driving);
    }

    #[test]
    fn test_stored_json_format() {
        let json = serde_json::to_string(&NavigationSettings::default()).unwrap();
        assert_eq!(
            json,
            r#"{"voiceEnabled":true,"showTraffic":true,"batteryOptimization":true,"navigationMode":"DRIVING"}"#
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: NavigationSettings =
            serde_json::from_str(r#"{"voiceEnabled":false,"navigationMode":"WALKING"}"#).unwrap();
        assert!(!settings.voice_enabled);
        assert!(settings.show_traffic);
        assert_eq!(settings.navigation_mode, NavigationMode::Walking);
    }

    #[test]
    fn test_with_update_touches_one_field() {
        let before = NavigationSettings::default();
        let after = before.with_update(SettingUpdate::BatteryOptimization(false));
        assert!(!after.battery_optimization);
        assert_eq!(after.voice_enabled, before.voice_enabled);
        assert_eq!(after.navigation_mode, before.navigation_mode);
    }

    #[test]
    fn test_key_parsing_accepts_both_styles() {
        assert_eq!("voiceEnabled".parse::<SettingKey>().unwrap(), SettingKey::VoiceEnabled);
        assert_eq!(
            "battery_optimization".parse::<SettingKey>().unwrap(),
            SettingKey::BatteryOptimization
        );
        assert!(matches!(
            "volume".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_update_parsing() {
        assert_eq!(
            SettingUpdate::parse(SettingKey::ShowTraffic, "off").unwrap(),
            SettingUpdate::ShowTraffic(false)
        );
        assert_eq!(
            SettingUpdate::parse(SettingKey::NavigationMode, "Transit").unwrap(),
            SettingUpdate::NavigationMode(NavigationMode::Transit)
        );
        assert!(SettingUpdate::parse(SettingKey::VoiceEnabled, "maybe").is_err());
        assert!(SettingUpdate::parse(SettingKey::NavigationMode, "flying").is_err());
    }
}
