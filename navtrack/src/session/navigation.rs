//! The navigation session state machine.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::config::SessionConfig;
use super::types::{CameraTarget, SessionError, SessionNotice, SessionPhase, SessionSnapshot};
use crate::coord::Coordinate;
use crate::directions::{DirectionsRequest, DirectionsRoute, ProviderError};
use crate::instruction::InstructionTranslator;
use crate::location::{
    select_polling_config, BatteryService, Heading, HeadingWatch, LocationError,
    LocationService, PermissionService, PermissionStatus, PollingConfig, PositionWatch,
};
use crate::route::RouteInfo;
use crate::settings::{NavigationMode, NavigationSettings, SettingUpdate, SettingsRepository};
use crate::voice::{SpeechEngine, VoiceAnnouncer};

/// Platform collaborators a session depends on.
#[derive(Clone)]
pub struct SessionServices {
    pub location: Arc<dyn LocationService>,
    pub battery: Arc<dyn BatteryService>,
    pub permissions: Arc<dyn PermissionService>,
    pub speech: Arc<dyn SpeechEngine>,
    pub settings: SettingsRepository,
}

impl std::fmt::Debug for SessionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServices")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A route fetch the session wants performed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Monotonic request number, for log correlation.
    pub id: u64,
    pub directions: DirectionsRequest,
}

/// An update from one of the session's subscriptions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    Position(Coordinate),
    Heading(Heading),
}

#[derive(Debug, Clone, Copy)]
enum StreamEnd {
    Position,
    Heading,
}

/// Tracks one trip to a fixed destination.
///
/// The session never performs network I/O itself. Operations that need a
/// route return a [`RouteRequest`]; whoever drives the session fetches it
/// and hands the outcome back through [`apply_route_result`]. Results are
/// applied in arrival order, so the last one to land wins.
///
/// State changes are published as [`SessionSnapshot`]s on a watch channel
/// and one-off events are sent as [`SessionNotice`]s.
///
/// [`apply_route_result`]: NavigationSession::apply_route_result
pub struct NavigationSession {
    destination: Coordinate,
    config: SessionConfig,
    translator: InstructionTranslator,
    services: SessionServices,
    announcer: VoiceAnnouncer,

    phase: SessionPhase,
    route: RouteInfo,
    current_location: Option<Coordinate>,
    heading: Option<f64>,
    is_navigating: bool,
    offline_mode: bool,
    settings: NavigationSettings,

    polling: Option<PollingConfig>,
    position_watch: Option<PositionWatch>,
    heading_watch: Option<HeadingWatch>,

    snapshot_tx: watch::Sender<SessionSnapshot>,
    notice_tx: mpsc::UnboundedSender<SessionNotice>,
    next_request_id: u64,
}

impl std::fmt::Debug for NavigationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationSession")
            .field("destination", &self.destination)
            .field("phase", &self.phase)
            .field("is_navigating", &self.is_navigating)
            .field("offline_mode", &self.offline_mode)
            .finish_non_exhaustive()
    }
}

impl NavigationSession {
    /// Creates an idle session heading for `destination`.
    ///
    /// Settings are loaded from the repository here, once. Returns the
    /// receiving end of the notice channel alongside the session.
    pub fn new(
        destination: Coordinate,
        services: SessionServices,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionNotice>) {
        let settings = services.settings.load_or_default();
        let translator = InstructionTranslator::new(config.language);
        let announcer = VoiceAnnouncer::new(Arc::clone(&services.speech), config.speech.clone());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let (snapshot_tx, _) = watch::channel(SessionSnapshot {
            phase: SessionPhase::Idle,
            destination,
            route: RouteInfo::default(),
            current_location: None,
            heading: None,
            is_navigating: false,
            offline_mode: false,
            settings,
        });

        debug!(?settings, "Loaded navigation settings");

        let session = Self {
            destination,
            config,
            translator,
            services,
            announcer,
            phase: SessionPhase::Idle,
            route: RouteInfo::default(),
            current_location: None,
            heading: None,
            is_navigating: false,
            offline_mode: false,
            settings,
            polling: None,
            position_watch: None,
            heading_watch: None,
            snapshot_tx,
            notice_tx,
            next_request_id: 0,
        };
        (session, notice_rx)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Checks permissions, takes a first fix and starts tracking.
    ///
    /// Returns the initial route request. On failure the matching notice is
    /// sent, everything acquired so far is released and the session stays
    /// idle.
    pub async fn open(&mut self) -> Result<Option<RouteRequest>, SessionError> {
        info!(destination = %self.destination, "Opening navigation session");

        if !self.services.permissions.services_enabled().await {
            return Err(self.fail(SessionError::ServiceDisabled));
        }

        let status = self.services.permissions.request_permission().await;
        if !status.allows_tracking() {
            return Err(self.fail(SessionError::PermissionDenied));
        }
        if status == PermissionStatus::ForegroundOnly {
            warn!("Background location not granted, tracking pauses in background");
        }

        let polling = self.polling_config();
        let fix = tokio::time::timeout(
            polling.fix_timeout,
            self.services.location.current_position(&polling),
        )
        .await;

        let position = match fix {
            Ok(Ok(position)) => position,
            Ok(Err(e)) => return Err(self.fail(SessionError::LocationUnavailable(e))),
            Err(_) => {
                let e = LocationError::Timeout(polling.fix_timeout);
                return Err(self.fail(SessionError::LocationUnavailable(e)));
            }
        };

        info!(position = %position, "First position fix");
        self.current_location = Some(position);
        self.phase = SessionPhase::Tracking;

        if let Err(e) = self.subscribe() {
            return Err(self.fail(e));
        }

        self.publish();
        Ok(self.route_request())
    }

    /// Releases all subscriptions and returns to idle. Idempotent.
    pub fn teardown(&mut self) {
        let was_active = self.phase != SessionPhase::Idle;

        self.release_position_watch();
        if let Some(mut watch) = self.heading_watch.take() {
            watch.release();
        }
        // Step changes are spoken outside guidance too
        if was_active || self.is_navigating {
            self.announcer.stop();
        }
        self.is_navigating = false;
        self.phase = SessionPhase::Idle;

        if was_active {
            info!("Navigation session closed");
        }
        self.publish();
    }

    fn fail(&mut self, error: SessionError) -> SessionError {
        warn!(error = %error, "Navigation session failed to open");
        if let Some(notice) = error.notice() {
            self.notify(notice);
        }
        self.teardown();
        error
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    fn polling_config(&self) -> PollingConfig {
        select_polling_config(
            self.settings.battery_optimization,
            self.services.battery.is_charging(),
            self.services.battery.level(),
        )
    }

    /// Replaces the position subscription, releasing the old one first.
    fn subscribe(&mut self) -> Result<(), SessionError> {
        self.release_position_watch();

        let polling = self.polling_config();
        let watch = self.services.location.watch_position(&polling)?;
        info!(
            accuracy = ?polling.accuracy,
            interval_ms = polling.interval_ms(),
            min_distance_m = polling.min_distance_m,
            navigating = self.is_navigating,
            "Position tracking started"
        );
        self.position_watch = Some(watch);
        self.polling = Some(polling);

        if self.heading_watch.is_none() {
            match self.services.location.watch_heading() {
                Ok(watch) => self.heading_watch = Some(watch),
                Err(e) => warn!(error = %e, "Heading updates unavailable"),
            }
        }
        Ok(())
    }

    /// Re-subscribes after a change that affects tracking. No-op when idle.
    fn refresh_subscription(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        if let Err(e) = self.subscribe() {
            warn!(error = %e, "Failed to restart position tracking");
            if let Some(notice) = e.notice() {
                self.notify(notice);
            }
        }
    }

    fn release_position_watch(&mut self) {
        if let Some(mut watch) = self.position_watch.take() {
            watch.release();
            debug!("Position tracking released");
        }
        self.polling = None;
    }

    /// Waits for the next position or heading update.
    ///
    /// Pends forever while no subscription is active. Cancel safe.
    pub async fn next_location_event(&mut self) -> LocationEvent {
        loop {
            let next = match (&mut self.position_watch, &mut self.heading_watch) {
                (None, None) => std::future::pending().await,
                (Some(position), None) => position
                    .recv()
                    .await
                    .map(LocationEvent::Position)
                    .ok_or(StreamEnd::Position),
                (None, Some(heading)) => heading
                    .recv()
                    .await
                    .map(LocationEvent::Heading)
                    .ok_or(StreamEnd::Heading),
                (Some(position), Some(heading)) => tokio::select! {
                    p = position.recv() => p.map(LocationEvent::Position).ok_or(StreamEnd::Position),
                    h = heading.recv() => h.map(LocationEvent::Heading).ok_or(StreamEnd::Heading),
                },
            };

            match next {
                Ok(event) => return event,
                Err(StreamEnd::Position) => {
                    info!("Position updates ended");
                    self.position_watch = None;
                    self.polling = None;
                    self.notify(SessionNotice::TrackingEnded);
                }
                Err(StreamEnd::Heading) => {
                    debug!("Heading updates ended");
                    self.heading_watch = None;
                }
            }
        }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Applies a position update.
    ///
    /// Re-matches the current step when a route is active and announces it
    /// if it changed. Returns a refresh request while navigating.
    pub async fn handle_position(&mut self, position: Coordinate) -> Option<RouteRequest> {
        self.current_location = Some(position);

        if self.phase == SessionPhase::RouteActive {
            match self.route.update_progress(&position) {
                Ok(Some(index)) => {
                    let instruction = self.route.next_instruction.clone();
                    info!(step = index, instruction = %instruction, "Advanced to step");
                    self.notify(SessionNotice::StepChanged {
                        index,
                        instruction: instruction.clone(),
                    });
                    self.announcer.announce(&self.settings, &instruction).await;
                }
                Ok(None) => {}
                Err(e) => debug!(error = %e, "Progress not updated"),
            }
        }

        self.publish();

        if self.is_navigating {
            self.route_request()
        } else {
            None
        }
    }

    /// Applies a heading update.
    pub fn handle_heading(&mut self, heading: Heading) {
        self.heading = Some(heading.degrees());
        self.publish();
    }

    /// Applies the outcome of a route fetch.
    ///
    /// Success replaces the route, aligns progress with the last known
    /// position and activates it. Failure switches to offline mode, which
    /// suppresses further fetches for the rest of the session.
    pub async fn apply_route_result(&mut self, result: Result<DirectionsRoute, ProviderError>) {
        if self.phase == SessionPhase::Idle {
            debug!("Session idle, dropping route result");
            return;
        }

        match result {
            Ok(directions) => {
                let mut route = RouteInfo::from_directions(&directions, &self.translator);
                if let Some(position) = self.current_location {
                    route.reset_progress(&position);
                }
                info!(
                    destination = %route.destination_address,
                    steps = route.steps().len(),
                    distance = %route.distance_text,
                    duration = %route.duration_text,
                    "Route updated"
                );
                self.route = route;
                self.phase = SessionPhase::RouteActive;

                if self.is_navigating {
                    let instruction = self.route.next_instruction.clone();
                    self.announcer.announce(&self.settings, &instruction).await;
                }
            }
            Err(e) => {
                warn!(error = %e, "Route fetch failed");
                if !self.offline_mode {
                    info!("Entering offline mode, route refreshes suspended");
                    self.offline_mode = true;
                    self.notify(SessionNotice::OfflineMode(e.to_string()));
                }
            }
        }

        self.publish();
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Starts turn-by-turn guidance.
    ///
    /// Requires a position fix; returns false otherwise. Points the camera
    /// at the traveler, speaks the start phrase and restarts tracking.
    pub async fn start(&mut self) -> bool {
        let Some(position) = self.current_location else {
            warn!("Cannot start navigation before the first position fix");
            return false;
        };
        if self.is_navigating {
            return true;
        }

        self.is_navigating = true;
        info!("Navigation started");
        self.notify(SessionNotice::FollowCamera(CameraTarget::follow(position)));

        let phrase = self.config.language.navigation_started();
        self.announcer.announce(&self.settings, phrase).await;

        self.refresh_subscription();
        self.publish();
        true
    }

    /// Stops guidance and halts speech. Tracking continues.
    pub fn stop(&mut self) {
        if !self.is_navigating {
            return;
        }

        self.is_navigating = false;
        self.announcer.stop();
        info!("Navigation stopped");

        self.refresh_subscription();
        self.publish();
    }

    /// Changes the travel mode. Returns a refetch request unless offline.
    pub fn set_mode(&mut self, mode: NavigationMode) -> Option<RouteRequest> {
        self.set_setting(SettingUpdate::NavigationMode(mode))
    }

    /// Changes one setting and writes the settings record through.
    ///
    /// A persistence failure is logged and the in-memory change kept.
    /// Changing battery optimization restarts tracking; changing the mode
    /// returns a refetch request.
    pub fn set_setting(&mut self, update: SettingUpdate) -> Option<RouteRequest> {
        let previous = self.settings;
        self.settings = previous.with_update(update);

        let key = update.key();
        info!(setting = key.name(), value = %self.settings.get(key), "Setting changed");
        if let Err(e) = self.services.settings.save(&self.settings) {
            warn!(error = %e, setting = key.name(), "Failed to persist settings");
        }

        if previous.battery_optimization != self.settings.battery_optimization {
            self.refresh_subscription();
        }

        let request = if previous.navigation_mode != self.settings.navigation_mode {
            self.route_request()
        } else {
            None
        };

        self.publish();
        request
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn route_request(&mut self) -> Option<RouteRequest> {
        if self.offline_mode {
            debug!("Offline, skipping route fetch");
            return None;
        }
        let origin = self.current_location?;

        self.next_request_id += 1;
        Some(RouteRequest {
            id: self.next_request_id,
            directions: DirectionsRequest {
                origin,
                destination: self.destination,
                mode: self.settings.navigation_mode,
                language: self.config.language,
            },
        })
    }

    fn notify(&self, notice: SessionNotice) {
        // Receiver dropped means nobody is presenting notices.
        let _ = self.notice_tx.send(notice);
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            destination: self.destination,
            route: self.route.clone(),
            current_location: self.current_location,
            heading: self.heading,
            is_navigating: self.is_navigating,
            offline_mode: self.offline_mode,
            settings: self.settings,
        }
    }

    /// Subscribes to snapshots published after each change.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn is_navigating(&self) -> bool {
        self.is_navigating
    }

    pub fn is_offline(&self) -> bool {
        self.offline_mode
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Polling parameters of the active position subscription.
    pub fn polling(&self) -> Option<PollingConfig> {
        self.polling
    }

    /// True while a position subscription is held.
    pub fn is_tracking(&self) -> bool {
        self.position_watch.is_some()
    }

    /// The last instruction spoken.
    pub fn last_spoken(&self) -> &str {
        self.announcer.last_spoken()
    }
}
