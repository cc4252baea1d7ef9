//! Route command - fetch directions and print the translated step list.

use std::path::PathBuf;

use navtrack::coord::Coordinate;
use navtrack::directions::{
    fetch_with_timeout, parse_directions, DirectionsRequest, DirectionsRoute,
    GoogleDirectionsProvider,
};
use navtrack::instruction::InstructionTranslator;
use navtrack::route::RouteInfo;

use super::common::{read_file, resolve_language, settings_repository, LanguageArg, ModeArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the route command.
pub struct RouteArgs {
    pub from: Coordinate,
    pub to: Coordinate,
    pub mode: Option<ModeArg>,
    pub language: Option<LanguageArg>,
    pub response: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

/// Run the route command.
pub fn run(args: RouteArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("route");
    let config = runner.config();

    let language = resolve_language(args.language, config);
    let mode = match args.mode {
        Some(mode) => mode.into(),
        None => settings_repository(config).load_or_default().navigation_mode,
    };

    let directions: DirectionsRoute = match &args.response {
        // Saved response: decode without touching the network
        Some(path) => parse_directions(read_file(path)?.as_bytes())?,
        None => {
            let directions_config = config.directions_config();
            let provider = GoogleDirectionsProvider::from_config(&directions_config).map_err(|e| {
                CliError::Config(format!(
                    "{}. Set directions.api_key with 'navtrack config set' or {}",
                    e,
                    navtrack::config::API_KEY_ENV
                ))
            })?;
            let request = DirectionsRequest {
                origin: args.from,
                destination: args.to,
                mode,
                language,
            };

            let runtime = runner.runtime()?;
            runtime.block_on(fetch_with_timeout(
                &provider,
                &request,
                directions_config.timeout,
            ))?
        }
    };

    let mut route = RouteInfo::from_directions(&directions, &InstructionTranslator::new(language));
    route.reset_progress(&args.from);

    if args.json {
        let json = serde_json::to_string_pretty(&route)
            .map_err(|e| CliError::Runtime(format!("Failed to encode route: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    print_route(&route, mode.as_query());
    Ok(())
}

fn print_route(route: &RouteInfo, mode: &str) {
    println!("Route to {}", route.destination_address);
    println!("================");
    println!("  Mode:     {}", mode);
    println!("  Distance: {}", route.distance_text);
    println!("  Duration: {}", route.duration_text);
    println!();

    for (index, step) in route.steps().iter().enumerate() {
        let marker = if index == route.current_step_index() {
            "→"
        } else {
            " "
        };
        println!(
            "{} {:>2}. {:<10} {:<32} [{}]",
            marker,
            index + 1,
            step.distance_text,
            step.instruction,
            step.icon()
        );
    }
}
