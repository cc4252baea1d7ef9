//! Integration tests for a navigation session driven by its runner.
//!
//! These tests verify the complete flow:
//! - first fix → route request → active route
//! - position updates → step matching → voice announcements
//! - directions failures → offline mode
//! - shutdown → subscriptions released
//!
//! Run with: `cargo test --test session_integration`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use navtrack::coord::Coordinate;
use navtrack::directions::{DirectionsRoute, DirectionsStep, ProviderError};
use navtrack::instruction::Language;
use navtrack::location::{LocationService, ReplayLocationService, StaticBattery};
use navtrack::session::{
    NavigationSession, SessionConfig, SessionError, SessionHandle, SessionNotice, SessionPhase,
    SessionRunner, SessionServices, SessionSnapshot,
};
use navtrack::settings::{MemorySettingsStore, NavigationMode, SettingsRepository};
use navtrack::testing::{
    MockDirectionsProvider, RecordingSpeechEngine, ScriptedLocationService, StaticPermissions,
};

// ============================================================================
// Helper Functions
// ============================================================================

const FIX: Coordinate = Coordinate::new_unchecked(37.78825, -122.4324);
const DESTINATION: Coordinate = Coordinate::new_unchecked(37.33, -121.90);
const NEAR_THIRD_STEP: Coordinate = Coordinate::new_unchecked(37.401, -121.951);

const WAIT: Duration = Duration::from_secs(5);

fn step(lat: f64, lon: f64, maneuver: Option<&str>, html: &str) -> DirectionsStep {
    DirectionsStep {
        start_location: Coordinate::new_unchecked(lat, lon),
        end_location: Coordinate::new_unchecked(lat - 0.01, lon + 0.01),
        distance_m: 500.0,
        maneuver: maneuver.map(str::to_string),
        html_instructions: html.to_string(),
    }
}

/// Three-step route from San Francisco towards San Jose.
fn three_steps() -> DirectionsRoute {
    DirectionsRoute {
        end_address: "San Jose, CA, USA".to_string(),
        distance_m: 67_400.0,
        duration_s: 3_010.0,
        steps: vec![
            step(37.78825, -122.4324, None, "Head <b>south</b>"),
            step(37.70, -122.40, Some("turn-left"), "Turn left toward <b>I-280 S</b>"),
            step(37.40, -121.95, Some("turn-right"), "Turn right toward <b>Market St</b>"),
        ],
    }
}

struct Running {
    handle: SessionHandle,
    notices: mpsc::UnboundedReceiver<SessionNotice>,
    speech: Arc<RecordingSpeechEngine>,
    shutdown: CancellationToken,
    task: JoinHandle<Result<(), SessionError>>,
}

fn spawn_session(
    location: Arc<dyn LocationService>,
    permissions: StaticPermissions,
    provider: Arc<MockDirectionsProvider>,
) -> Running {
    let speech = Arc::new(RecordingSpeechEngine::new());
    let services = SessionServices {
        location,
        battery: Arc::new(StaticBattery::new(0.8, false)),
        permissions: Arc::new(permissions),
        speech: speech.clone(),
        settings: SettingsRepository::new(Arc::new(MemorySettingsStore::new())),
    };
    let config = SessionConfig::default().with_language(Language::English);
    let (session, notices) = NavigationSession::new(DESTINATION, services, config);
    let (runner, handle) = SessionRunner::new(session, provider, Duration::from_secs(15));

    let shutdown = CancellationToken::new();
    let task = tokio::spawn(runner.run(shutdown.clone()));

    Running {
        handle,
        notices,
        speech,
        shutdown,
        task,
    }
}

/// Waits until the published snapshot satisfies `condition`.
async fn wait_for(
    rx: &mut watch::Receiver<SessionSnapshot>,
    condition: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    tokio::time::timeout(WAIT, rx.wait_for(condition))
        .await
        .expect("timed out waiting for session state")
        .expect("session dropped its snapshot sender")
        .clone()
}

fn drain(notices: &mut mpsc::UnboundedReceiver<SessionNotice>) -> Vec<SessionNotice> {
    let mut out = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        out.push(notice);
    }
    out
}

// ============================================================================
// Integration Tests
// ============================================================================

/// First fix → route fetched → position near the third step → step 3
/// announced exactly once.
#[tokio::test]
async fn test_fix_route_and_step_announcement() {
    let location = Arc::new(ScriptedLocationService::with_fix(FIX));
    let provider = Arc::new(MockDirectionsProvider::new(three_steps()));
    let mut running = spawn_session(location.clone(), StaticPermissions::granted(), provider.clone());
    let mut snapshots = running.handle.subscribe();

    let snapshot = wait_for(&mut snapshots, |s| s.phase == SessionPhase::RouteActive).await;
    assert_eq!(snapshot.route.steps().len(), 3);
    assert_eq!(snapshot.route.current_step_index(), 0);
    assert_eq!(snapshot.route.destination_address, "San Jose, CA, USA");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].origin, FIX);
    assert_eq!(requests[0].destination, DESTINATION);
    assert_eq!(requests[0].mode, NavigationMode::Driving);

    assert!(location.push_position(NEAR_THIRD_STEP).await);
    let snapshot = wait_for(&mut snapshots, |s| s.route.current_step_index() == 2).await;
    assert_eq!(
        snapshot.route.next_instruction,
        "Turn right, heading toward Market St"
    );

    // A second position on the same step must not repeat the announcement
    let still_third = Coordinate::new_unchecked(37.4005, -121.9505);
    assert!(location.push_position(still_third).await);
    wait_for(&mut snapshots, |s| s.current_location == Some(still_third)).await;

    assert_eq!(
        running.speech.spoken(),
        vec!["Turn right, heading toward Market St".to_string()]
    );
    let step_notices: Vec<_> = drain(&mut running.notices)
        .into_iter()
        .filter(|n| matches!(n, SessionNotice::StepChanged { .. }))
        .collect();
    assert_eq!(step_notices.len(), 1);

    running.shutdown.cancel();
    running.task.await.unwrap().unwrap();
}

/// A failing directions service switches the session to offline mode and
/// suppresses further fetches, even while navigating.
#[tokio::test]
async fn test_directions_failure_goes_offline() {
    let location = Arc::new(ScriptedLocationService::with_fix(FIX));
    let provider = Arc::new(MockDirectionsProvider::failing(ProviderError::HttpError(
        "HTTP 503".to_string(),
    )));
    let mut running = spawn_session(location.clone(), StaticPermissions::granted(), provider.clone());
    let mut snapshots = running.handle.subscribe();

    let snapshot = wait_for(&mut snapshots, |s| s.offline_mode).await;
    assert_eq!(snapshot.phase, SessionPhase::Tracking);
    assert!(snapshot.route.is_empty());

    running.handle.start().await.unwrap();
    wait_for(&mut snapshots, |s| s.is_navigating).await;

    let moved = Coordinate::new_unchecked(37.7801, -122.4301);
    assert!(location.push_position(moved).await);
    wait_for(&mut snapshots, |s| s.current_location == Some(moved)).await;

    assert_eq!(provider.requests().len(), 1);
    let offline: Vec<_> = drain(&mut running.notices)
        .into_iter()
        .filter(|n| matches!(n, SessionNotice::OfflineMode(_)))
        .collect();
    assert_eq!(offline.len(), 1);

    running.shutdown.cancel();
    running.task.await.unwrap().unwrap();
}

/// A failed refresh after a good route keeps the route and stops fetching.
#[tokio::test]
async fn test_failed_refresh_keeps_route() {
    let location = Arc::new(ScriptedLocationService::with_fix(FIX));
    let provider = Arc::new(MockDirectionsProvider::failing(ProviderError::HttpError(
        "HTTP 503".to_string(),
    )));
    provider.push(Ok(three_steps()));
    let mut running = spawn_session(location.clone(), StaticPermissions::granted(), provider.clone());
    let mut snapshots = running.handle.subscribe();

    wait_for(&mut snapshots, |s| s.phase == SessionPhase::RouteActive).await;
    running.handle.start().await.unwrap();
    wait_for(&mut snapshots, |s| s.is_navigating).await;

    // Navigating: this position triggers the refresh that fails
    let moved = Coordinate::new_unchecked(37.7801, -122.4301);
    assert!(location.push_position(moved).await);
    let snapshot = wait_for(&mut snapshots, |s| s.offline_mode).await;
    assert_eq!(snapshot.phase, SessionPhase::RouteActive);
    assert_eq!(snapshot.route.steps().len(), 3);

    assert!(location.push_position(NEAR_THIRD_STEP).await);
    let snapshot = wait_for(&mut snapshots, |s| s.route.current_step_index() == 2).await;
    assert_eq!(snapshot.route.steps().len(), 3);
    assert_eq!(provider.requests().len(), 2);

    let offline = drain(&mut running.notices)
        .into_iter()
        .filter(|n| matches!(n, SessionNotice::OfflineMode(_)))
        .count();
    assert_eq!(offline, 1);

    running.shutdown.cancel();
    running.task.await.unwrap().unwrap();
}

/// Denied permission ends the run before any subscription or fetch.
#[tokio::test]
async fn test_permission_denied_ends_run() {
    let location = Arc::new(ScriptedLocationService::with_fix(FIX));
    let provider = Arc::new(MockDirectionsProvider::new(three_steps()));
    let mut running = spawn_session(location.clone(), StaticPermissions::denied(), provider.clone());

    let result = running.task.await.unwrap();
    assert_eq!(result, Err(SessionError::PermissionDenied));
    assert_eq!(drain(&mut running.notices), vec![SessionNotice::PermissionDenied]);
    assert_eq!(location.position_subscriptions(), 0);
    assert!(provider.requests().is_empty());
}

/// Shutdown releases every subscription the session opened.
#[tokio::test]
async fn test_shutdown_releases_watches() {
    let location = Arc::new(ScriptedLocationService::with_fix(FIX));
    let provider = Arc::new(MockDirectionsProvider::new(three_steps()));
    let running = spawn_session(location.clone(), StaticPermissions::granted(), provider);
    let mut snapshots = running.handle.subscribe();

    wait_for(&mut snapshots, |s| s.phase == SessionPhase::RouteActive).await;
    assert_eq!(location.active_position_watches(), 1);
    assert_eq!(location.active_heading_watches(), 1);

    running.shutdown.cancel();
    running.task.await.unwrap().unwrap();

    assert_eq!(location.active_position_watches(), 0);
    assert_eq!(location.active_heading_watches(), 0);
    assert_eq!(running.handle.snapshot().phase, SessionPhase::Idle);
}

/// A replayed track drives the session to the last step and then ends.
#[tokio::test(start_paused = true)]
async fn test_replayed_track_reaches_last_step() {
    let track = vec![
        FIX,
        Coordinate::new_unchecked(37.701, -122.401),
        NEAR_THIRD_STEP,
    ];
    let location = Arc::new(ReplayLocationService::new(track).with_interval(Duration::from_millis(500)));
    let provider = Arc::new(MockDirectionsProvider::new(three_steps()));
    let mut running = spawn_session(location.clone(), StaticPermissions::granted(), provider);

    let ended = tokio::time::timeout(Duration::from_secs(30), async {
        while let Some(notice) = running.notices.recv().await {
            if notice == SessionNotice::TrackingEnded {
                return true;
            }
        }
        false
    })
    .await
    .expect("replay did not finish");
    assert!(ended);
    assert!(location.is_finished());

    let snapshot = running.handle.snapshot();
    assert_eq!(snapshot.current_location, Some(NEAR_THIRD_STEP));
    assert_eq!(snapshot.route.current_step_index(), 2);
    assert!(snapshot.heading.is_some());

    running.shutdown.cancel();
    running.task.await.unwrap().unwrap();
}
