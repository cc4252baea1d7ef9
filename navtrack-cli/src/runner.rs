//! Shared command setup: configuration, logging and the async runtime.

use navtrack::config::ConfigFile;
use navtrack::logging::{init_logging, LoggingConfig, LoggingGuard};
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Everything a command needs before doing its work.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Loads the config file and installs logging.
    ///
    /// `verbose` forces debug level regardless of the configured one.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let mut logging = LoggingConfig::default().with_level(config.logging.level.clone());
        if verbose {
            logging = logging.with_level("debug");
        }
        if let Some(file) = &config.logging.file {
            logging = logging.with_file(file.clone());
        }
        let guard = init_logging(&logging)?;

        Ok(Self {
            config,
            _logging: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Logs the command being run.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            command,
            "navtrack starting"
        );
    }

    /// Builds a multi-threaded tokio runtime.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
