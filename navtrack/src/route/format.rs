//! Human-readable distance and duration text.

use crate::instruction::Language;

/// Formats a distance in meters.
///
/// Below one kilometer the value is shown in whole meters, otherwise in
/// kilometers with one decimal place.
pub fn format_distance(meters: f64, language: Language) -> String {
    let meters = if meters.is_finite() { meters.max(0.0) } else { 0.0 };

    if meters < 1000.0 {
        match language {
            Language::Chinese => format!("{:.0}米", meters),
            Language::English => format!("{:.0} m", meters),
        }
    } else {
        let km = meters / 1000.0;
        match language {
            Language::Chinese => format!("{:.1}公里", km),
            Language::English => format!("{:.1} km", km),
        }
    }
}

/// Formats a duration in seconds as whole minutes, rounded up.
pub fn format_duration(seconds: f64, language: Language) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).ceil() as u64;

    match language {
        Language::Chinese => format!("{}分钟", minutes),
        Language::English => format!("{} min", minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_distances_in_meters() {
        assert_eq!(format_distance(0.0, Language::English), "0 m");
        assert_eq!(format_distance(850.4, Language::English), "850 m");
        assert_eq!(format_distance(850.4, Language::Chinese), "850米");
    }

    #[test]
    fn test_long_distances_in_kilometers() {
        assert_eq!(format_distance(1000.0, Language::English), "1.0 km");
        assert_eq!(format_distance(12_345.0, Language::English), "12.3 km");
        assert_eq!(format_distance(1_200.0, Language::Chinese), "1.2公里");
    }

    #[test]
    fn test_bad_distance_input() {
        assert_eq!(format_distance(-5.0, Language::English), "0 m");
        assert_eq!(format_distance(f64::NAN, Language::English), "0 m");
    }

    #[test]
    fn test_duration_rounds_up() {
        assert_eq!(format_duration(0.0, Language::English), "0 min");
        assert_eq!(format_duration(61.0, Language::English), "2 min");
        assert_eq!(format_duration(720.0, Language::Chinese), "12分钟");
    }
}
