//! Output language for spoken and displayed text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used for instruction phrases, distance units, and speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// Simplified Chinese (`zh-CN`).
    #[default]
    Chinese,
    /// English (`en`).
    English,
}

impl Language {
    /// BCP-47 tag passed to speech engines and the directions service.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Chinese => "zh-CN",
            Language::English => "en",
        }
    }

    /// Resolves a language tag, matching on the primary subtag.
    ///
    /// Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "zh" => Some(Language::Chinese),
            "en" => Some(Language::English),
            _ => None,
        }
    }

    /// Phrase spoken when guidance begins.
    pub fn navigation_started(&self) -> &'static str {
        match self {
            Language::Chinese => "导航开始",
            Language::English => "Navigation started",
        }
    }

    /// Phrase for continuing straight, used for absent or unknown maneuvers.
    pub fn continue_straight(&self) -> &'static str {
        match self {
            Language::Chinese => "直行",
            Language::English => "Continue straight",
        }
    }

    /// Joins a maneuver phrase with the road it leads toward.
    pub fn heading_toward(&self, phrase: &str, road: &str) -> String {
        match self {
            Language::Chinese => format!("{}，前往{}", phrase, road),
            Language::English => format!("{}, heading toward {}", phrase, road),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported language '{}'", s))
    }
}
