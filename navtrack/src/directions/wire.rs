//! Google Directions JSON decoding.
//!
//! Only the first leg of the first route is used. A response is accepted
//! when `status` is `OK` or absent; `ZERO_RESULTS` and `NOT_FOUND` map to
//! [`ProviderError::NoRoute`], any other status to [`ProviderError::Status`].

use serde::Deserialize;

use super::types::{DirectionsRoute, DirectionsStep, ProviderError};
use crate::coord::Coordinate;

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    legs: Vec<WireLeg>,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    #[serde(default)]
    end_address: String,
    distance: WireValue,
    duration: WireValue,
    #[serde(default)]
    steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
struct WireValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct WireStep {
    start_location: WireLatLng,
    end_location: WireLatLng,
    distance: WireValue,
    #[serde(default)]
    maneuver: Option<String>,
    #[serde(default)]
    html_instructions: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct WireLatLng {
    lat: f64,
    lng: f64,
}

impl WireLatLng {
    fn to_coordinate(self) -> Result<Coordinate, ProviderError> {
        Coordinate::new(self.lat, self.lng).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

/// Decodes a directions response body.
pub fn parse_directions(body: &[u8]) -> Result<DirectionsRoute, ProviderError> {
    let response: WireResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    match response.status.as_deref() {
        None | Some("OK") => {}
        Some("ZERO_RESULTS") | Some("NOT_FOUND") => return Err(ProviderError::NoRoute),
        Some(status) => {
            return Err(ProviderError::Status {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            })
        }
    }

    let route = response.routes.into_iter().next().ok_or(ProviderError::NoRoute)?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("route has no legs".to_string()))?;

    if leg.steps.is_empty() {
        return Err(ProviderError::NoRoute);
    }

    let steps = leg
        .steps
        .into_iter()
        .map(|step| {
            Ok(DirectionsStep {
                start_location: step.start_location.to_coordinate()?,
                end_location: step.end_location.to_coordinate()?,
                distance_m: step.distance.value,
                maneuver: step.maneuver.filter(|m| !m.is_empty()),
                html_instructions: step.html_instructions,
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    Ok(DirectionsRoute {
        end_address: leg.end_address,
        distance_m: leg.distance.value,
        duration_s: leg.duration.value,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "OK",
        "routes": [{
            "legs": [{
                "end_address": "San Jose, CA, USA",
                "distance": {"text": "67.4 km", "value": 67400},
                "duration": {"text": "51 mins", "value": 3010},
                "steps": [
                    {
                        "start_location": {"lat": 37.78825, "lng": -122.4324},
                        "end_location": {"lat": 37.7800, "lng": -122.4200},
                        "distance": {"text": "1.2 km", "value": 1200},
                        "html_instructions": "Head <b>south</b> on <b>Fillmore St</b>"
                    },
                    {
                        "start_location": {"lat": 37.7800, "lng": -122.4200},
                        "end_location": {"lat": 37.3300, "lng": -121.9000},
                        "distance": {"text": "66.2 km", "value": 66200},
                        "maneuver": "turn-left",
                        "html_instructions": "Turn <b>left</b> toward <b>US-101 S</b>"
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_parse_first_leg() {
        let route = parse_directions(SAMPLE.as_bytes()).unwrap();
        assert_eq!(route.end_address, "San Jose, CA, USA");
        assert_eq!(route.distance_m, 67_400.0);
        assert_eq!(route.duration_s, 3_010.0);
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].maneuver, None);
        assert_eq!(route.steps[1].maneuver.as_deref(), Some("turn-left"));
        assert_eq!(
            route.steps[1].end_location,
            Coordinate::new_unchecked(37.33, -121.90)
        );
    }

    #[test]
    fn test_zero_results_is_no_route() {
        let body = br#"{"status": "ZERO_RESULTS", "routes": []}"#;
        assert_eq!(parse_directions(body), Err(ProviderError::NoRoute));
    }

    #[test]
    fn test_missing_routes_is_no_route() {
        assert_eq!(parse_directions(b"{}"), Err(ProviderError::NoRoute));
    }

    #[test]
    fn test_denied_status_carries_message() {
        let body = br#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#;
        match parse_directions(body) {
            Err(ProviderError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert!(message.contains("API key"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_route_without_legs_is_parse_error() {
        let body = br#"{"status": "OK", "routes": [{"legs": []}]}"#;
        assert!(matches!(parse_directions(body), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_leg_without_steps_is_no_route() {
        let body = br#"{"routes": [{"legs": [{
            "distance": {"value": 0}, "duration": {"value": 0}, "steps": []
        }]}]}"#;
        assert_eq!(parse_directions(body), Err(ProviderError::NoRoute));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_directions(b"<html>502</html>"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_out_of_range_location_is_parse_error() {
        let body = br#"{"routes": [{"legs": [{
            "distance": {"value": 1}, "duration": {"value": 1},
            "steps": [{
                "start_location": {"lat": 95.0, "lng": 0.0},
                "end_location": {"lat": 0.0, "lng": 0.0},
                "distance": {"value": 1}
            }]
        }]}]}"#;
        assert!(matches!(parse_directions(body), Err(ProviderError::Parse(_))));
    }
}
