//! Async driver for a [`NavigationSession`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        SessionRunner                          │
//! │                                                               │
//! │  SessionHandle ──► commands ──┐                               │
//! │  position/heading watches ────┼──► NavigationSession ──► snapshots
//! │  route results ───────────────┘          │               notices
//! │        ▲                                 │ RouteRequest        │
//! │        │                                 ▼                    │
//! │        └──────────── spawned fetch ◄── DirectionsProvider     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Route fetches run as separate tasks so a slow directions service never
//! blocks position handling. Results are applied in arrival order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::navigation::{LocationEvent, NavigationSession, RouteRequest};
use super::types::{SessionError, SessionSnapshot};
use crate::directions::{fetch_with_timeout, DirectionsProvider, DirectionsRoute, ProviderError};
use crate::settings::{NavigationMode, SettingUpdate};

/// Default capacity of the command channel.
pub const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 32;

/// User actions forwarded to the runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    Start,
    Stop,
    SetMode(NavigationMode),
    SetSetting(SettingUpdate),
}

#[derive(Debug)]
struct RouteResult {
    id: u64,
    result: Result<DirectionsRoute, ProviderError>,
}

/// Cloneable handle for controlling a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Starts guidance.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Start).await
    }

    /// Stops guidance.
    pub async fn stop(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Stop).await
    }

    /// Changes the travel mode.
    pub async fn set_mode(&self, mode: NavigationMode) -> Result<(), SessionError> {
        self.send(SessionCommand::SetMode(mode)).await
    }

    /// Changes one setting.
    pub async fn set_setting(&self, update: SettingUpdate) -> Result<(), SessionError> {
        self.send(SessionCommand::SetSetting(update)).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Owns a session and drives it from its event sources.
pub struct SessionRunner {
    session: NavigationSession,
    provider: Arc<dyn DirectionsProvider>,
    route_timeout: Duration,
    command_rx: mpsc::Receiver<SessionCommand>,
    result_tx: mpsc::UnboundedSender<RouteResult>,
    result_rx: mpsc::UnboundedReceiver<RouteResult>,
    fetches: CancellationToken,
}

impl SessionRunner {
    /// Creates a runner and the handle used to control it.
    pub fn new(
        session: NavigationSession,
        provider: Arc<dyn DirectionsProvider>,
        route_timeout: Duration,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(DEFAULT_COMMAND_CHANNEL_CAPACITY);
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let snapshot_rx = session.subscribe_snapshots();

        let runner = Self {
            session,
            provider,
            route_timeout,
            command_rx,
            result_tx,
            result_rx,
            fetches: CancellationToken::new(),
        };
        let handle = SessionHandle {
            command_tx,
            snapshot_rx,
        };
        (runner, handle)
    }

    /// Opens the session and processes events until shutdown.
    ///
    /// Returns early with the open error if permissions or the first fix
    /// fail. Also stops once every [`SessionHandle`] is dropped. Everything
    /// the session acquired is released before returning.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), SessionError> {
        let initial = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                self.session.teardown();
                return Ok(());
            }
            opened = self.session.open() => opened?,
        };
        self.dispatch(initial);

        info!(provider = self.provider.name(), "Navigation session running");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Navigation session shutting down");
                    break;
                }

                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        debug!("All session handles dropped");
                        break;
                    }
                },

                Some(RouteResult { id, result }) = self.result_rx.recv() => {
                    debug!(request = id, ok = result.is_ok(), "Route result received");
                    self.session.apply_route_result(result).await;
                }

                event = self.session.next_location_event() => match event {
                    LocationEvent::Position(position) => {
                        let request = self.session.handle_position(position).await;
                        self.dispatch(request);
                    }
                    LocationEvent::Heading(heading) => self.session.handle_heading(heading),
                },
            }
        }

        self.fetches.cancel();
        self.session.teardown();
        Ok(())
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        debug!(?command, "Session command");
        match command {
            SessionCommand::Start => {
                self.session.start().await;
            }
            SessionCommand::Stop => self.session.stop(),
            SessionCommand::SetMode(mode) => {
                let request = self.session.set_mode(mode);
                self.dispatch(request);
            }
            SessionCommand::SetSetting(update) => {
                let request = self.session.set_setting(update);
                self.dispatch(request);
            }
        }
    }

    /// Spawns a fetch for `request`; its result comes back on the result
    /// channel.
    fn dispatch(&self, request: Option<RouteRequest>) {
        let Some(RouteRequest { id, directions }) = request else {
            return;
        };

        let provider = Arc::clone(&self.provider);
        let result_tx = self.result_tx.clone();
        let cancel = self.fetches.child_token();
        let timeout = self.route_timeout;

        debug!(request = id, mode = directions.mode.as_query(), "Fetching route");

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                result = fetch_with_timeout(provider.as_ref(), &directions, timeout) => {
                    let _ = result_tx.send(RouteResult { id, result });
                }
            }
        });
    }
}
