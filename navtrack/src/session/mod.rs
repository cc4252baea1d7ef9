//! Navigation session.
//!
//! A session tracks one trip: it gates on location permission, follows the
//! device position, keeps the route fresh while navigating, matches the
//! current step and speaks new instructions.
//!
//! # State Machine
//!
//! ```text
//! Idle ──(first fix)──► Tracking ──(route received)──► RouteActive
//!  ▲                       │                               │
//!  └───────(teardown)──────┴───────────────────────────────┘
//! ```
//!
//! `is_navigating` and `offline_mode` are flags orthogonal to the phase.
//! Offline mode is sticky for the session's lifetime.
//!
//! # Example
//!
//! ```ignore
//! use navtrack::session::{NavigationSession, SessionConfig, SessionRunner};
//!
//! let (session, notices) = NavigationSession::new(destination, services, SessionConfig::default());
//! let (runner, handle) = SessionRunner::new(session, provider, Duration::from_secs(15));
//!
//! let shutdown = CancellationToken::new();
//! tokio::spawn(runner.run(shutdown.clone()));
//! handle.start().await?;
//! ```

mod config;
mod navigation;
mod runner;
mod types;

pub use config::{SessionConfig, DEFAULT_ROUTE_TIMEOUT};
pub use navigation::{LocationEvent, NavigationSession, RouteRequest, SessionServices};
pub use runner::{SessionCommand, SessionHandle, SessionRunner, DEFAULT_COMMAND_CHANNEL_CAPACITY};
pub use types::{
    CameraTarget, SessionError, SessionNotice, SessionPhase, SessionSnapshot, FOLLOW_PITCH,
    FOLLOW_ZOOM,
};
