//! In-memory collaborators for tests and demos.
//!
//! These stand in for the network, the platform location stack and the
//! speech engine so sessions can be driven deterministically.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::coord::Coordinate;
use crate::directions::{
    AsyncHttpClient, DirectionsProvider, DirectionsRequest, DirectionsRoute, ProviderError,
};
use crate::location::{
    Heading, HeadingWatch, LocationError, LocationService, PermissionService, PermissionStatus,
    PollingConfig, PositionWatch, Watch, WatchFeed, DEFAULT_WATCH_CAPACITY,
};
use crate::voice::{SpeechEngine, SpeechError, SpeechOptions};
use crate::BoxFuture;

// =============================================================================
// HTTP
// =============================================================================

/// HTTP client returning a canned response and recording requested URLs.
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    response: Result<Vec<u8>, ProviderError>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockHttpClient {
    pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs requested so far, shared across clones.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl AsyncHttpClient for MockHttpClient {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, ProviderError>> {
        self.requests.lock().push(url.to_string());
        let response = self.response.clone();
        Box::pin(async move { response })
    }
}

// =============================================================================
// Directions
// =============================================================================

/// Directions provider with scripted results.
///
/// Queued results are returned in order; once the queue is empty every
/// request gets the fallback result.
#[derive(Debug)]
pub struct MockDirectionsProvider {
    queue: Mutex<VecDeque<Result<DirectionsRoute, ProviderError>>>,
    fallback: Result<DirectionsRoute, ProviderError>,
    delay: Option<Duration>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl MockDirectionsProvider {
    /// Always returns `route`.
    pub fn new(route: DirectionsRoute) -> Self {
        Self::with_fallback(Ok(route))
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<DirectionsRoute, ProviderError>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Waits `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a one-off result.
    pub fn push(&self, result: Result<DirectionsRoute, ProviderError>) {
        self.queue.lock().push_back(result);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().clone()
    }
}

impl DirectionsProvider for MockDirectionsProvider {
    fn fetch_route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> BoxFuture<'a, Result<DirectionsRoute, ProviderError>> {
        self.requests.lock().push(request.clone());
        let result = self
            .queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

// =============================================================================
// Speech
// =============================================================================

#[derive(Debug, Default)]
struct SpeechLog {
    spoken: Vec<String>,
    last_options: Option<SpeechOptions>,
    fail_next: Option<SpeechError>,
    stops: usize,
}

/// Speech engine that records utterances instead of playing them.
#[derive(Debug, Default)]
pub struct RecordingSpeechEngine {
    log: Mutex<SpeechLog>,
}

impl RecordingSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances accepted so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.log.lock().spoken.clone()
    }

    /// Makes the next `speak` call fail with `error`.
    pub fn fail_next(&self, error: SpeechError) {
        self.log.lock().fail_next = Some(error);
    }

    /// Options passed with the most recent utterance.
    pub fn last_options(&self) -> Option<SpeechOptions> {
        self.log.lock().last_options.clone()
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> usize {
        self.log.lock().stops
    }
}

impl SpeechEngine for RecordingSpeechEngine {
    fn speak<'a>(
        &'a self,
        text: &'a str,
        options: &'a SpeechOptions,
    ) -> BoxFuture<'a, Result<(), SpeechError>> {
        let result = {
            let mut log = self.log.lock();
            match log.fail_next.take() {
                Some(error) => Err(error),
                None => {
                    log.spoken.push(text.to_string());
                    log.last_options = Some(options.clone());
                    Ok(())
                }
            }
        };
        Box::pin(async move { result })
    }

    fn stop(&self) -> Result<(), SpeechError> {
        self.log.lock().stops += 1;
        Ok(())
    }
}

// =============================================================================
// Location
// =============================================================================

#[derive(Debug, Default)]
struct LocationState {
    position_feeds: Vec<WatchFeed<Coordinate>>,
    heading_feeds: Vec<WatchFeed<Heading>>,
    polling: Vec<PollingConfig>,
}

/// Location service driven by the test.
///
/// The first fix is fixed at construction; later positions and headings are
/// pushed into whichever subscription is currently active.
#[derive(Debug)]
pub struct ScriptedLocationService {
    fix: Option<Result<Coordinate, LocationError>>,
    state: Mutex<LocationState>,
}

impl ScriptedLocationService {
    /// First fix succeeds with `position`.
    pub fn with_fix(position: Coordinate) -> Self {
        Self::new(Some(Ok(position)))
    }

    /// First fix fails with `error`.
    pub fn failing(error: LocationError) -> Self {
        Self::new(Some(Err(error)))
    }

    /// First fix never arrives.
    pub fn never_fixes() -> Self {
        Self::new(None)
    }

    fn new(fix: Option<Result<Coordinate, LocationError>>) -> Self {
        Self {
            fix,
            state: Mutex::new(LocationState::default()),
        }
    }

    /// Delivers a position to the active subscription.
    ///
    /// Returns false if no subscription is active.
    pub async fn push_position(&self, position: Coordinate) -> bool {
        let feed = active(&self.state.lock().position_feeds);
        match feed {
            Some(feed) => feed.send(position).await,
            None => false,
        }
    }

    /// Delivers a heading to the active subscription.
    pub async fn push_heading(&self, heading: Heading) -> bool {
        let feed = active(&self.state.lock().heading_feeds);
        match feed {
            Some(feed) => feed.send(heading).await,
            None => false,
        }
    }

    /// Ends the active position subscription from the producer side.
    pub fn end_positions(&self) {
        self.state.lock().position_feeds.clear();
    }

    /// Total position subscriptions ever opened.
    pub fn position_subscriptions(&self) -> usize {
        self.state.lock().polling.len()
    }

    /// Position subscriptions not yet released.
    pub fn active_position_watches(&self) -> usize {
        count_active(&self.state.lock().position_feeds)
    }

    /// Heading subscriptions not yet released.
    pub fn active_heading_watches(&self) -> usize {
        count_active(&self.state.lock().heading_feeds)
    }

    /// Polling parameters of every position subscription, in order.
    pub fn polling_history(&self) -> Vec<PollingConfig> {
        self.state.lock().polling.clone()
    }
}

fn active<T>(feeds: &[WatchFeed<T>]) -> Option<WatchFeed<T>> {
    feeds.iter().rev().find(|f| !f.is_released()).cloned()
}

fn count_active<T>(feeds: &[WatchFeed<T>]) -> usize {
    feeds.iter().filter(|f| !f.is_released()).count()
}

impl LocationService for ScriptedLocationService {
    fn current_position<'a>(
        &'a self,
        _config: &'a PollingConfig,
    ) -> BoxFuture<'a, Result<Coordinate, LocationError>> {
        match self.fix.clone() {
            Some(result) => Box::pin(async move { result }),
            None => Box::pin(std::future::pending::<Result<Coordinate, LocationError>>()),
        }
    }

    fn watch_position(&self, config: &PollingConfig) -> Result<PositionWatch, LocationError> {
        let (feed, watch) = Watch::channel(DEFAULT_WATCH_CAPACITY);
        let mut state = self.state.lock();
        state.position_feeds.push(feed);
        state.polling.push(*config);
        Ok(watch)
    }

    fn watch_heading(&self) -> Result<HeadingWatch, LocationError> {
        let (feed, watch) = Watch::channel(DEFAULT_WATCH_CAPACITY);
        self.state.lock().heading_feeds.push(feed);
        Ok(watch)
    }
}

// =============================================================================
// Permissions
// =============================================================================

/// Permission gate with fixed answers.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    services_enabled: bool,
    status: PermissionStatus,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            services_enabled: true,
            status: PermissionStatus::Granted,
        }
    }

    pub fn foreground_only() -> Self {
        Self {
            services_enabled: true,
            status: PermissionStatus::ForegroundOnly,
        }
    }

    pub fn denied() -> Self {
        Self {
            services_enabled: true,
            status: PermissionStatus::Denied,
        }
    }

    pub fn services_disabled() -> Self {
        Self {
            services_enabled: false,
            status: PermissionStatus::Granted,
        }
    }
}

impl PermissionService for StaticPermissions {
    fn services_enabled(&self) -> BoxFuture<'_, bool> {
        let enabled = self.services_enabled;
        Box::pin(async move { enabled })
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        let status = self.status;
        Box::pin(async move { status })
    }
}
