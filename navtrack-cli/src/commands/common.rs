//! Common types and helpers shared across CLI commands.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use navtrack::config::ConfigFile;
use navtrack::instruction::Language;
use navtrack::settings::{FileSettingsStore, NavigationMode, SettingsRepository};

use crate::error::CliError;

/// Travel mode selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl From<ModeArg> for NavigationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Driving => NavigationMode::Driving,
            ModeArg::Walking => NavigationMode::Walking,
            ModeArg::Bicycling => NavigationMode::Bicycling,
            ModeArg::Transit => NavigationMode::Transit,
        }
    }
}

/// Instruction language selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LanguageArg {
    /// Simplified Chinese
    Zh,
    /// English
    En,
}

impl From<LanguageArg> for Language {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::Zh => Language::Chinese,
            LanguageArg::En => Language::English,
        }
    }
}

/// CLI language if given, else the configured one.
pub fn resolve_language(cli: Option<LanguageArg>, config: &ConfigFile) -> Language {
    cli.map(Language::from)
        .unwrap_or(config.directions.language)
}

/// Settings repository over the configured settings file.
pub fn settings_repository(config: &ConfigFile) -> SettingsRepository {
    SettingsRepository::new(Arc::new(FileSettingsStore::new(config.settings_path())))
}

/// Reads a UTF-8 file.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_conversion() {
        assert_eq!(NavigationMode::from(ModeArg::Transit), NavigationMode::Transit);
    }

    #[test]
    fn test_cli_language_wins() {
        let config = ConfigFile::default();
        assert_eq!(resolve_language(None, &config), Language::Chinese);
        assert_eq!(
            resolve_language(Some(LanguageArg::En), &config),
            Language::English
        );
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, CliError::ReadFile { .. }));
    }
}
