//! Session state, notices, and errors.

use serde::Serialize;
use thiserror::Error;

use crate::coord::Coordinate;
use crate::location::LocationError;
use crate::route::RouteInfo;
use crate::settings::{NavigationMode, NavigationSettings};

/// Camera pitch applied when navigation starts, in degrees.
pub const FOLLOW_PITCH: f32 = 45.0;

/// Camera zoom applied when navigation starts.
pub const FOLLOW_ZOOM: f32 = 18.0;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Not tracking: before the first fix, or after teardown.
    #[default]
    Idle,
    /// Position known, no route yet.
    Tracking,
    /// A route has been received.
    RouteActive,
}

/// Where a map view should point while following the traveler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    pub center: Coordinate,
    pub pitch: f32,
    pub heading: f32,
    pub zoom: f32,
}

impl CameraTarget {
    /// Tilted, north-up close-up over `center`.
    pub fn follow(center: Coordinate) -> Self {
        Self {
            center,
            pitch: FOLLOW_PITCH,
            heading: 0.0,
            zoom: FOLLOW_ZOOM,
        }
    }
}

/// One-off events a presentation layer may surface to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionNotice {
    /// Location services are switched off.
    ServiceDisabled,
    /// Location permission was refused.
    PermissionDenied,
    /// No position could be obtained.
    LocationUnavailable(String),
    /// A route fetch failed; route refreshes are suspended.
    OfflineMode(String),
    /// Navigation started; move the camera here.
    FollowCamera(CameraTarget),
    /// The current step changed.
    StepChanged { index: usize, instruction: String },
    /// The position source stopped producing updates.
    TrackingEnded,
}

/// Read-only view of session state, published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub destination: Coordinate,
    pub route: RouteInfo,
    pub current_location: Option<Coordinate>,
    pub heading: Option<f64>,
    pub is_navigating: bool,
    pub offline_mode: bool,
    pub settings: NavigationSettings,
}

impl SessionSnapshot {
    /// Travel mode currently in effect.
    pub fn navigation_mode(&self) -> NavigationMode {
        self.settings.navigation_mode
    }
}

/// Errors that end or reject session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// Location services are switched off.
    #[error("Location services are disabled")]
    ServiceDisabled,

    /// Location permission was refused.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position fix or subscription could be obtained.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    /// The session runner is no longer running.
    #[error("Navigation session is closed")]
    Closed,
}

impl SessionError {
    /// Notice to surface for this error, if any.
    pub fn notice(&self) -> Option<SessionNotice> {
        match self {
            SessionError::ServiceDisabled => Some(SessionNotice::ServiceDisabled),
            SessionError::PermissionDenied => Some(SessionNotice::PermissionDenied),
            SessionError::LocationUnavailable(e) => {
                Some(SessionNotice::LocationUnavailable(e.to_string()))
            }
            SessionError::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_follow_camera_defaults() {
        let center = Coordinate::new_unchecked(37.78825, -122.4324);
        let camera = CameraTarget::follow(center);
        assert_eq!(camera.center, center);
        assert_eq!(camera.pitch, 45.0);
        assert_eq!(camera.heading, 0.0);
        assert_eq!(camera.zoom, 18.0);
    }

    #[test]
    fn test_error_notices() {
        assert_eq!(
            SessionError::PermissionDenied.notice(),
            Some(SessionNotice::PermissionDenied)
        );
        let timeout = SessionError::from(LocationError::Timeout(Duration::from_secs(10)));
        assert!(matches!(
            timeout.notice(),
            Some(SessionNotice::LocationUnavailable(msg)) if msg.contains("10s")
        ));
        assert_eq!(SessionError::Closed.notice(), None);
    }
}
