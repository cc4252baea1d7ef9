//! Routes and progress along them.
//!
//! A [`RouteInfo`] is created fresh from every successful directions
//! response and then mutated in place as positions arrive: the
//! [`nearest_step`] matcher picks the step whose start point is closest to
//! the user, and that becomes the current step.

mod format;
mod matcher;
mod types;

pub use format::{format_distance, format_duration};
pub use matcher::nearest_step;
pub use types::{RouteInfo, RouteStep};

use thiserror::Error;

/// Errors from route progress queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A nearest-step lookup was attempted on a route with no steps.
    #[error("Route has no steps")]
    EmptyRoute,
}
