//! Nearest-step matching.

use crate::coord::{distance, Coordinate};

use super::{RouteError, RouteStep};

/// Finds the step whose start location is closest to `position`.
///
/// Every step is considered regardless of order, so the result may move
/// backwards when the user backtracks. Ties resolve to the lowest index.
///
/// # Errors
///
/// Returns [`RouteError::EmptyRoute`] if `steps` is empty.
pub fn nearest_step(position: &Coordinate, steps: &[RouteStep]) -> Result<usize, RouteError> {
    nearest_index(position, steps.iter().map(|step| &step.start_location))
}

/// Index of the anchor point closest to `position`.
///
/// Uses strict `<` so the first of several equidistant anchors wins.
pub(crate) fn nearest_index<'a, I>(position: &Coordinate, anchors: I) -> Result<usize, RouteError>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut best: Option<(usize, f64)> = None;

    for (index, anchor) in anchors.into_iter().enumerate() {
        let d = distance(position, anchor);
        let closer = match best {
            Some((_, min)) => d < min,
            None => true,
        };
        if closer {
            best = Some((index, d));
        }
    }

    best.map(|(index, _)| index).ok_or(RouteError::EmptyRoute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn step_at(lat: f64, lon: f64) -> RouteStep {
        let at = Coordinate::new_unchecked(lat, lon);
        RouteStep {
            start_location: at,
            end_location: at,
            distance_text: String::new(),
            maneuver: None,
            instruction: String::new(),
        }
    }

    #[test]
    fn test_empty_route_is_an_error() {
        let here = Coordinate::new_unchecked(0.0, 0.0);
        assert_eq!(nearest_step(&here, &[]), Err(RouteError::EmptyRoute));
    }

    #[test]
    fn test_picks_closest_start() {
        let steps = vec![
            step_at(37.7880, -122.4320),
            step_at(37.7900, -122.4300),
            step_at(37.8000, -122.4200),
        ];
        let near_last = Coordinate::new_unchecked(37.7999, -122.4201);
        assert_eq!(nearest_step(&near_last, &steps), Ok(2));
    }

    #[test]
    fn test_ties_resolve_to_first() {
        let steps = vec![step_at(1.0, 0.0), step_at(-1.0, 0.0), step_at(1.0, 0.0)];
        let origin = Coordinate::new_unchecked(0.0, 0.0);
        assert_eq!(nearest_step(&origin, &steps), Ok(0));
    }

    #[test]
    fn test_can_move_backwards() {
        let steps = vec![step_at(0.0, 0.0), step_at(0.0, 1.0), step_at(0.0, 2.0)];
        assert_eq!(
            nearest_step(&Coordinate::new_unchecked(0.0, 1.9), &steps),
            Ok(2)
        );
        assert_eq!(
            nearest_step(&Coordinate::new_unchecked(0.0, 0.1), &steps),
            Ok(0)
        );
    }

    proptest! {
        #[test]
        fn prop_result_is_a_first_minimum(
            anchors in prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 1..20),
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
        ) {
            let steps: Vec<RouteStep> = anchors.iter().map(|&(a, b)| step_at(a, b)).collect();
            let position = Coordinate::new_unchecked(lat, lon);
            let index = nearest_step(&position, &steps).unwrap();
            let best = distance(&position, &steps[index].start_location);

            for (i, step) in steps.iter().enumerate() {
                let d = distance(&position, &step.start_location);
                prop_assert!(d >= best, "step {} is closer than chosen {}", i, index);
                if i < index {
                    prop_assert!(d > best, "earlier step {} ties chosen {}", i, index);
                }
            }
        }
    }
}
