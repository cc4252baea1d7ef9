//! Simulate command - replay a recorded track through a full navigation
//! session, speaking instructions to the log.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use navtrack::coord::Coordinate;
use navtrack::directions::{
    parse_directions, DirectionsProvider, DirectionsRequest, DirectionsRoute,
    GoogleDirectionsProvider, ProviderError,
};
use navtrack::location::{parse_track, GrantedPermissions, ReplayLocationService, StaticBattery};
use navtrack::session::{
    NavigationSession, SessionConfig, SessionNotice, SessionRunner, SessionServices,
    SessionSnapshot,
};
use navtrack::voice::{LogSpeechEngine, SpeechOptions};
use navtrack::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::common::{read_file, resolve_language, settings_repository, LanguageArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub to: Coordinate,
    pub track: PathBuf,
    pub response: Option<PathBuf>,
    pub interval_ms: Option<u64>,
    pub navigate: bool,
    pub battery: f32,
    pub charging: bool,
    pub language: Option<LanguageArg>,
    pub verbose: bool,
}

/// Directions provider answering every request with one saved response.
struct SavedRouteProvider {
    route: DirectionsRoute,
}

impl DirectionsProvider for SavedRouteProvider {
    fn fetch_route<'a>(
        &'a self,
        _request: &'a DirectionsRequest,
    ) -> BoxFuture<'a, Result<DirectionsRoute, ProviderError>> {
        let route = self.route.clone();
        Box::pin(async move { Ok(route) })
    }

    fn name(&self) -> &str {
        "Saved response"
    }
}

/// Run the simulate command.
pub fn run(args: SimulateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("simulate");
    let config = runner.config();

    let track = parse_track(&read_file(&args.track)?)?;
    if track.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "track {} contains no positions",
            args.track.display()
        )));
    }

    let mut location = ReplayLocationService::new(track);
    if let Some(ms) = args.interval_ms {
        location = location.with_interval(Duration::from_millis(ms.max(1)));
    }

    let provider: Arc<dyn DirectionsProvider> = match &args.response {
        Some(path) => Arc::new(SavedRouteProvider {
            route: parse_directions(read_file(path)?.as_bytes())?,
        }),
        None => Arc::new(GoogleDirectionsProvider::from_config(
            &config.directions_config(),
        )?),
    };

    let language = resolve_language(args.language, config);
    // --language switches the voice too
    let speech = match args.language {
        Some(_) => SpeechOptions::for_language(language)
            .with_pitch(config.voice.pitch)
            .with_rate(config.voice.rate),
        None => config.speech_options(),
    };
    let session_config = SessionConfig::default()
        .with_language(language)
        .with_speech(speech)
        .with_route_timeout(Duration::from_secs(config.directions.timeout_secs));

    let services = SessionServices {
        location: Arc::new(location.clone()),
        battery: Arc::new(StaticBattery::new(args.battery, args.charging)),
        permissions: Arc::new(GrantedPermissions),
        speech: Arc::new(LogSpeechEngine),
        settings: settings_repository(config),
    };

    println!("Navtrack Simulation");
    println!("===================");
    println!("Track:       {} ({} positions)", args.track.display(), location.len());
    println!("Destination: {}", args.to);
    println!("Provider:    {}", provider.name());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let shutdown = CancellationToken::new();
    let ctrlc_shutdown = shutdown.clone();
    ctrlc::set_handler(move || {
        ctrlc_shutdown.cancel();
    })
    .map_err(|e| CliError::Runtime(format!("Failed to set Ctrl+C handler: {}", e)))?;

    let destination = args.to;
    let navigate = args.navigate;
    let route_timeout = session_config.route_timeout;

    let runtime = runner.runtime()?;
    let snapshot = runtime.block_on(async move {
        let (session, mut notices) = NavigationSession::new(destination, services, session_config);
        let (session_runner, handle) = SessionRunner::new(session, provider, route_timeout);
        let task = tokio::spawn(session_runner.run(shutdown.clone()));

        // A closed session surfaces its own error from the task below
        if navigate && handle.start().await.is_err() {
            tracing::debug!("Session closed before guidance could start");
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                notice = notices.recv() => match notice {
                    Some(notice) => {
                        print_notice(&notice);
                        if notice == SessionNotice::TrackingEnded {
                            shutdown.cancel();
                        }
                    }
                    None => break,
                },
            }
        }

        let snapshot = handle.snapshot();
        drop(handle);
        task.await
            .map_err(|e| CliError::Runtime(format!("Session task failed: {}", e)))??;
        Ok::<SessionSnapshot, CliError>(snapshot)
    })?;

    print_summary(&snapshot);
    Ok(())
}

fn print_notice(notice: &SessionNotice) {
    match notice {
        SessionNotice::ServiceDisabled => println!("! Location services are disabled"),
        SessionNotice::PermissionDenied => println!("! Location permission denied"),
        SessionNotice::LocationUnavailable(reason) => println!("! Location unavailable: {}", reason),
        SessionNotice::OfflineMode(reason) => {
            println!("! Offline mode, using last known route ({})", reason)
        }
        SessionNotice::FollowCamera(camera) => println!(
            "  Camera: follow {} (pitch {}°, zoom {})",
            camera.center, camera.pitch, camera.zoom
        ),
        SessionNotice::StepChanged { index, instruction } => {
            println!("→ Step {}: {}", index + 1, instruction)
        }
        SessionNotice::TrackingEnded => println!("  Track finished"),
    }
}

fn print_summary(snapshot: &SessionSnapshot) {
    println!();
    println!("Session Summary");
    println!("───────────────");
    if snapshot.route.is_empty() {
        println!("  No route received");
    } else {
        println!("  Destination: {}", snapshot.route.destination_address);
        println!(
            "  Route:       {} / {}",
            snapshot.route.distance_text, snapshot.route.duration_text
        );
        println!(
            "  Last step:   {} of {}",
            snapshot.route.current_step_index() + 1,
            snapshot.route.steps().len()
        );
        println!("  Instruction: {}", snapshot.route.next_instruction);
    }
    if let Some(position) = snapshot.current_location {
        println!("  Position:    {}", position);
    }
    if snapshot.offline_mode {
        println!("  Ended in offline mode");
    }
}
