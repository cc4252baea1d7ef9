//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use navtrack::config::ConfigError;
use navtrack::coord::CoordError;
use navtrack::directions::ProviderError;
use navtrack::logging::LoggingError;
use navtrack::session::SessionError;
use navtrack::settings::SettingsError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration is missing or invalid.
    Config(String),
    /// A command-line argument could not be used.
    InvalidArgument(String),
    /// A file could not be read.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Navigation settings could not be loaded or saved.
    Settings(SettingsError),
    /// The directions service failed.
    Directions(ProviderError),
    /// The navigation session could not run.
    Session(SessionError),
    /// The async runtime failed.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::ReadFile { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
            CliError::Settings(e) => write!(f, "{}", e),
            CliError::Directions(e) => write!(f, "Directions request failed: {}", e),
            CliError::Session(e) => write!(f, "Navigation failed: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ReadFile { source, .. } => Some(source),
            CliError::Logging(e) => Some(e),
            CliError::Settings(e) => Some(e),
            CliError::Directions(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::InvalidArgument(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Directions(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}
