//! Geographic coordinates and great-circle distance.
//!
//! Distances use the Haversine formula on a spherical Earth of radius
//! 6,371,000 m. Ellipsoidal correction is ignored; the error is well under
//! 0.5% which is far below GPS noise for step matching.

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters.
///
/// Pure and deterministic. Inputs outside the valid coordinate ranges still
/// produce a finite, non-negative result.
#[inline]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair outside [0, 1]; clamp so sqrt stays real.
    let h = if h.is_finite() { h.clamp(0.0, 1.0) } else { 0.0 };
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `a` to `b`.
///
/// Returns degrees in [0, 360), where 0 = North and 90 = East. Coincident
/// points yield 0.
pub fn bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
    let deg = y.atan2(x).to_degrees();

    if !deg.is_finite() {
        0.0
    } else {
        deg.rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lon)
    }

    #[test]
    fn test_same_point_is_zero() {
        let sf = coord(37.78825, -122.4324);
        assert_eq!(distance(&sf, &sf), 0.0);
    }

    #[test]
    fn test_san_francisco_to_san_jose() {
        // Roughly 67 km as the crow flies
        let sf = coord(37.78825, -122.4324);
        let sj = coord(37.33, -121.90);
        let d = distance(&sf, &sj);
        assert!(
            (65_000.0..70_000.0).contains(&d),
            "Expected ~67 km, got {} m",
            d
        );
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is ~111.195 km on a 6371 km sphere
        let d = distance(&coord(0.0, 0.0), &coord(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance(&coord(0.0, 0.0), &coord(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_out_of_range_input_is_finite() {
        let d = distance(&coord(500.0, -999.0), &coord(-720.0, 3600.0));
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        let d = distance(&coord(f64::NAN, 0.0), &coord(0.0, 0.0));
        assert!(d.is_finite());
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = coord(0.0, 0.0);
        assert!((bearing(&origin, &coord(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(&origin, &coord(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(&origin, &coord(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(&origin, &coord(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_same_point() {
        let sf = coord(37.78825, -122.4324);
        assert_eq!(bearing(&sf, &sf), 0.0);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let a = coord(lat1, lon1);
            let b = coord(lat2, lon2);
            let ab = distance(&a, &b);
            let ba = distance(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-6, "ab={} ba={}", ab, ba);
        }

        #[test]
        fn prop_distance_to_self_is_zero(
            lat in -90.0f64..=90.0, lon in -180.0f64..=180.0,
        ) {
            let a = coord(lat, lon);
            prop_assert_eq!(distance(&a, &a), 0.0);
        }

        #[test]
        fn prop_distance_is_bounded(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let d = distance(&coord(lat1, lon1), &coord(lat2, lon2));
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1.0);
        }
    }
}
