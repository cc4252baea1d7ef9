//! Route data model.

use serde::Serialize;

use crate::coord::Coordinate;
use crate::directions::DirectionsRoute;
use crate::instruction::{icon_for, InstructionTranslator};

use super::format::{format_distance, format_duration};
use super::matcher::nearest_step;
use super::RouteError;

/// One segment of a route with its own anchor point and instruction.
///
/// Immutable once produced by [`RouteInfo::from_directions`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// Where the step begins; used as the matching anchor.
    pub start_location: Coordinate,
    /// Where the step ends.
    pub end_location: Coordinate,
    /// Formatted step length.
    pub distance_text: String,
    /// Raw maneuver code, if the service reported one.
    pub maneuver: Option<String>,
    /// Localized instruction text.
    pub instruction: String,
}

impl RouteStep {
    /// Icon name for this step's maneuver.
    pub fn icon(&self) -> &'static str {
        icon_for(self.maneuver.as_deref())
    }
}

/// The active route and the user's progress along it.
///
/// `current_step_index` is always a valid index when `steps` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteInfo {
    /// Address of the final leg's end point.
    pub destination_address: String,
    /// Formatted total duration.
    pub duration_text: String,
    /// Formatted total distance.
    pub distance_text: String,
    /// Ordered steps.
    steps: Vec<RouteStep>,
    /// Index of the step nearest to the last known position.
    current_step_index: usize,
    /// Instruction of the current step.
    pub next_instruction: String,
}

impl RouteInfo {
    /// Builds route info from a directions response, translating each step.
    pub fn from_directions(route: &DirectionsRoute, translator: &InstructionTranslator) -> Self {
        let language = translator.language();

        let steps: Vec<RouteStep> = route
            .steps
            .iter()
            .map(|step| RouteStep {
                start_location: step.start_location,
                end_location: step.end_location,
                distance_text: format_distance(step.distance_m, language),
                maneuver: step.maneuver.clone(),
                instruction: translator
                    .translate(step.maneuver.as_deref(), &step.html_instructions),
            })
            .collect();

        let next_instruction = steps
            .first()
            .map(|s| s.instruction.clone())
            .unwrap_or_default();

        Self {
            destination_address: route.end_address.clone(),
            duration_text: format_duration(route.duration_s, language),
            distance_text: format_distance(route.distance_m, language),
            steps,
            current_step_index: 0,
            next_instruction,
        }
    }

    /// The ordered step list.
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// True if the route has no steps (e.g. before the first fetch).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the current step.
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    /// The current step, if any.
    pub fn current_step(&self) -> Option<&RouteStep> {
        self.steps.get(self.current_step_index)
    }

    /// Re-matches the current step against `position`.
    ///
    /// Returns `Ok(Some(index))` when the current step changed and
    /// `Ok(None)` when it stayed the same.
    ///
    /// # Errors
    ///
    /// [`RouteError::EmptyRoute`] if there are no steps.
    pub fn update_progress(&mut self, position: &Coordinate) -> Result<Option<usize>, RouteError> {
        let nearest = nearest_step(position, &self.steps)?;
        if nearest == self.current_step_index {
            return Ok(None);
        }

        self.current_step_index = nearest;
        self.next_instruction = self.steps[nearest].instruction.clone();
        Ok(Some(nearest))
    }

    /// Aligns the current step with `position` without reporting a change.
    ///
    /// Used right after a fresh route replaces the old one.
    pub fn reset_progress(&mut self, position: &Coordinate) {
        if let Ok(nearest) = nearest_step(position, &self.steps) {
            self.current_step_index = nearest;
            self.next_instruction = self.steps[nearest].instruction.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::DirectionsStep;
    use crate::instruction::Language;

    fn three_step_route() -> DirectionsRoute {
        let step = |lat: f64, lon: f64, maneuver: Option<&str>, html: &str| DirectionsStep {
            start_location: Coordinate::new_unchecked(lat, lon),
            end_location: Coordinate::new_unchecked(lat + 0.001, lon),
            distance_m: 120.0,
            maneuver: maneuver.map(str::to_string),
            html_instructions: html.to_string(),
        };
        DirectionsRoute {
            end_address: "San Jose, CA, USA".to_string(),
            distance_m: 67_400.0,
            duration_s: 3_010.0,
            steps: vec![
                step(37.78825, -122.4324, None, "Head <b>south</b>"),
                step(37.7800, -122.4200, Some("turn-left"), "Turn left toward <b>US-101 S</b>"),
                step(37.7000, -122.4000, Some("merge"), "Merge onto <b>US-101 S</b>"),
            ],
        }
    }

    #[test]
    fn test_from_directions_translates_and_formats() {
        let translator = InstructionTranslator::new(Language::English);
        let info = RouteInfo::from_directions(&three_step_route(), &translator);

        assert_eq!(info.destination_address, "San Jose, CA, USA");
        assert_eq!(info.distance_text, "67.4 km");
        assert_eq!(info.duration_text, "51 min");
        assert_eq!(info.steps().len(), 3);
        assert_eq!(info.current_step_index(), 0);
        assert_eq!(info.next_instruction, "Continue straight");
        assert_eq!(
            info.steps()[1].instruction,
            "Turn left, heading toward US-101 S"
        );
        assert_eq!(info.steps()[1].distance_text, "120 m");
        assert_eq!(info.steps()[1].icon(), "maps.left");
    }

    #[test]
    fn test_update_progress_reports_changes_only() {
        let translator = InstructionTranslator::new(Language::English);
        let mut info = RouteInfo::from_directions(&three_step_route(), &translator);

        let near_third = Coordinate::new_unchecked(37.7001, -122.4001);
        assert_eq!(info.update_progress(&near_third), Ok(Some(2)));
        assert_eq!(info.next_instruction, "Merge");
        assert_eq!(info.update_progress(&near_third), Ok(None));
    }

    #[test]
    fn test_update_progress_on_empty_route() {
        let mut info = RouteInfo::default();
        let here = Coordinate::new_unchecked(0.0, 0.0);
        assert_eq!(info.update_progress(&here), Err(RouteError::EmptyRoute));
        assert!(info.current_step().is_none());
    }

    #[test]
    fn test_reset_progress_is_silent_on_empty_route() {
        let mut info = RouteInfo::default();
        info.reset_progress(&Coordinate::new_unchecked(0.0, 0.0));
        assert_eq!(info.current_step_index(), 0);
    }
}
