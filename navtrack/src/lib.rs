//! Navtrack - turn-by-turn navigation progress tracking
//!
//! This library tracks a device's position against a route obtained from a
//! directions service, works out which step of the route the traveler is on,
//! renders localized instructions, and speaks them when they change.
//!
//! # Modules
//!
//! - [`coord`]: coordinates and great-circle distance
//! - [`route`]: route model, step matching, distance/duration formatting
//! - [`instruction`]: HTML instruction cleanup and maneuver phrases
//! - [`voice`]: deduplicated speech output
//! - [`location`]: polling policy and platform location seams
//! - [`directions`]: directions service client
//! - [`settings`]: persisted navigation preferences
//! - [`session`]: the navigation session state machine and its runner
//! - [`config`]: INI configuration file
//! - [`logging`]: tracing subscriber setup
//! - [`testing`]: in-memory collaborators for tests and demos

use std::future::Future;
use std::pin::Pin;

pub mod config;
pub mod coord;
pub mod directions;
pub mod instruction;
pub mod location;
pub mod logging;
pub mod route;
pub mod session;
pub mod settings;
pub mod testing;
pub mod voice;

/// Boxed future used by the dyn-compatible async traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
