//! Position tracking collaborators.
//!
//! - [`policy`]: battery-aware choice of polling parameters
//! - [`LocationService`], [`BatteryService`], [`PermissionService`]: the
//!   platform seams a session depends on
//! - [`Watch`]: releasable subscriptions for position and heading updates
//! - [`ReplayLocationService`]: plays back a recorded track

pub mod policy;
mod replay;
mod service;
mod watch;

pub use policy::{select_polling_config, AccuracyTier, PollingConfig, LOW_BATTERY_THRESHOLD};
pub use replay::{parse_track, ReplayLocationService};
pub use service::{
    BatteryService, GrantedPermissions, LocationError, LocationService, PermissionService,
    PermissionStatus, StaticBattery,
};
pub use watch::{Heading, HeadingWatch, PositionWatch, Watch, WatchFeed, DEFAULT_WATCH_CAPACITY};
