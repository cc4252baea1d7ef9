//! Navigation settings commands.
//!
//! These are the user-facing toggles the session persists between runs
//! (voice, traffic, battery optimization, travel mode), as opposed to the
//! program configuration handled by `config`.

use clap::Subcommand;
use navtrack::config::ConfigFile;
use navtrack::settings::{SettingKey, SettingUpdate, SettingsRepository};

use super::common::settings_repository;
use crate::error::CliError;

/// Settings subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show the stored navigation settings
    Show,

    /// Change one navigation setting
    Set {
        /// Setting name (voiceEnabled, showTraffic, batteryOptimization, navigationMode)
        key: String,

        /// New value (true/false, or a travel mode)
        value: String,
    },
}

/// Run a settings subcommand.
pub fn run(command: SettingsCommands) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let repo = settings_repository(&config);

    match command {
        SettingsCommands::Show => run_show(&repo),
        SettingsCommands::Set { key, value } => run_set(&repo, &key, &value),
    }
}

fn run_show(repo: &SettingsRepository) -> Result<(), CliError> {
    let settings = repo.load()?.unwrap_or_default();

    println!("Navigation Settings");
    println!("===================");
    for key in SettingKey::ALL {
        println!("  {:<20} {}", key.name(), settings.get(key));
    }

    Ok(())
}

fn run_set(repo: &SettingsRepository, key: &str, value: &str) -> Result<(), CliError> {
    let key: SettingKey = key.parse()?;
    let update = SettingUpdate::parse(key, value)?;

    let current = repo.load()?.unwrap_or_default();
    let updated = repo.update(current, update)?;

    println!("Set {} = {}", key, updated.get(key));
    Ok(())
}
