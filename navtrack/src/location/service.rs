//! Platform collaborator traits: position fixes, battery, permissions.

use std::time::Duration;

use thiserror::Error;

use super::policy::PollingConfig;
use super::watch::{HeadingWatch, PositionWatch};
use crate::coord::Coordinate;
use crate::BoxFuture;

/// Errors from location collaborators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    /// No fix arrived within the allowed time.
    #[error("Timed out waiting for a position fix after {0:?}")]
    Timeout(Duration),

    /// The platform could not produce a position.
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// A subscription could not be established.
    #[error("Failed to subscribe to updates: {0}")]
    Subscription(String),
}

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Foreground and background access granted.
    Granted,
    /// Foreground access only; tracking stops when backgrounded.
    ForegroundOnly,
    /// Access refused.
    Denied,
}

impl PermissionStatus {
    /// True if positions may be read at all.
    pub fn allows_tracking(&self) -> bool {
        !matches!(self, PermissionStatus::Denied)
    }
}

/// Source of device position and heading.
pub trait LocationService: Send + Sync {
    /// Reads a single position fix.
    ///
    /// Callers bound the wait with `config.fix_timeout`.
    fn current_position<'a>(
        &'a self,
        config: &'a PollingConfig,
    ) -> BoxFuture<'a, Result<Coordinate, LocationError>>;

    /// Starts a position subscription with the given polling parameters.
    fn watch_position(&self, config: &PollingConfig) -> Result<PositionWatch, LocationError>;

    /// Starts a compass heading subscription.
    fn watch_heading(&self) -> Result<HeadingWatch, LocationError>;
}

/// Battery state.
pub trait BatteryService: Send + Sync {
    /// Charge level as a fraction in [0, 1].
    fn level(&self) -> f32;

    /// True while on external power.
    fn is_charging(&self) -> bool;
}

/// Location permission gate.
pub trait PermissionService: Send + Sync {
    /// True if location services are switched on.
    fn services_enabled(&self) -> BoxFuture<'_, bool>;

    /// Asks for location permission.
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus>;
}

/// Battery reporting a fixed state.
///
/// Used where the host has no battery information (desktop, replay).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBattery {
    level: f32,
    charging: bool,
}

impl StaticBattery {
    /// Battery at `level` with the given charging state.
    pub fn new(level: f32, charging: bool) -> Self {
        Self { level, charging }
    }

    /// Fully charged, on external power.
    pub fn mains() -> Self {
        Self::new(1.0, true)
    }
}

impl Default for StaticBattery {
    fn default() -> Self {
        Self::mains()
    }
}

impl BatteryService for StaticBattery {
    fn level(&self) -> f32 {
        self.level
    }

    fn is_charging(&self) -> bool {
        self.charging
    }
}

/// Permission gate that always allows access.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrantedPermissions;

impl PermissionService for GrantedPermissions {
    fn services_enabled(&self) -> BoxFuture<'_, bool> {
        Box::pin(async { true })
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus> {
        Box::pin(async { PermissionStatus::Granted })
    }
}
