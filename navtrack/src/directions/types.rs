//! Directions request/response model and errors.

use std::time::Duration;

use thiserror::Error;

use crate::coord::Coordinate;
use crate::instruction::Language;
use crate::settings::NavigationMode;

/// Errors from directions providers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// No response within the allowed time.
    #[error("Directions request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be understood.
    #[error("Malformed directions response: {0}")]
    Parse(String),

    /// The service answered but found no usable route.
    #[error("No route found")]
    NoRoute,

    /// The service rejected the request.
    #[error("Directions service returned {status}: {message}")]
    Status { status: String, message: String },

    /// The provider is not usable as configured.
    #[error("Directions provider misconfigured: {0}")]
    Config(String),
}

/// A request for a route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    /// Start point (usually the current position).
    pub origin: Coordinate,
    /// End point.
    pub destination: Coordinate,
    /// Travel mode.
    pub mode: NavigationMode,
    /// Language for instruction text.
    pub language: Language,
}

/// One step of a provider route, before translation.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsStep {
    /// Where the step begins.
    pub start_location: Coordinate,
    /// Where the step ends.
    pub end_location: Coordinate,
    /// Step length in meters.
    pub distance_m: f64,
    /// Provider maneuver code such as `turn-left`.
    pub maneuver: Option<String>,
    /// Instruction markup as returned by the provider.
    pub html_instructions: String,
}

/// The first leg of the first route in a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRoute {
    /// Address of the leg's end point.
    pub end_address: String,
    /// Total distance in meters.
    pub distance_m: f64,
    /// Total duration in seconds.
    pub duration_s: f64,
    /// Ordered, non-empty step list.
    pub steps: Vec<DirectionsStep>,
}
