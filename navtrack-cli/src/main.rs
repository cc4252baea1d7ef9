//! Navtrack CLI - turn-by-turn navigation progress from the command line.
//!
//! `route` fetches directions and prints the translated steps, `simulate`
//! replays a recorded track through a full navigation session.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use navtrack::coord::Coordinate;

use commands::common::{LanguageArg, ModeArg};
use commands::config::ConfigCommands;
use commands::route::RouteArgs;
use commands::settings::SettingsCommands;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "navtrack")]
#[command(version, about = "Turn-by-turn navigation progress tracking")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a route and print its steps
    Route {
        /// Origin as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Travel mode (defaults to the stored navigation setting)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Instruction language (defaults to directions.language)
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,

        /// Use a saved Directions API response instead of calling the service
        #[arg(long)]
        response: Option<PathBuf>,

        /// Print the route as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a recorded track through a navigation session
    Simulate {
        /// Destination as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,

        /// Track file with one LAT,LON per line
        #[arg(long)]
        track: PathBuf,

        /// Use a saved Directions API response instead of calling the service
        #[arg(long)]
        response: Option<PathBuf>,

        /// Delay between replayed positions in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Start guidance as soon as the session is open
        #[arg(long)]
        navigate: bool,

        /// Simulated battery level between 0.0 and 1.0
        #[arg(long, default_value = "1.0")]
        battery: f32,

        /// Simulate a charging device
        #[arg(long)]
        charging: bool,

        /// Instruction language (defaults to directions.language)
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
    },

    /// View or change the stored navigation settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// View or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let verbose = cli.verbose;
    match cli.command {
        Command::Route {
            from,
            to,
            mode,
            language,
            response,
            json,
        } => commands::route::run(RouteArgs {
            from,
            to,
            mode,
            language,
            response,
            json,
            verbose,
        }),
        Command::Simulate {
            to,
            track,
            response,
            interval_ms,
            navigate,
            battery,
            charging,
            language,
        } => commands::simulate::run(SimulateArgs {
            to,
            track,
            response,
            interval_ms,
            navigate,
            battery,
            charging,
            language,
            verbose,
        }),
        Command::Settings(command) => commands::settings::run(command),
        Command::Config(command) => commands::config::run(command),
    }
}
