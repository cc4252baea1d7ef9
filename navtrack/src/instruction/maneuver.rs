//! Maneuver codes reported by the directions service.

use std::str::FromStr;

use super::Language;

/// A coded turn/merge type attached to a route step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maneuver {
    TurnLeft,
    TurnRight,
    TurnSlightLeft,
    TurnSlightRight,
    TurnSharpLeft,
    TurnSharpRight,
    UturnLeft,
    UturnRight,
    Straight,
    Merge,
    RampLeft,
    RampRight,
    ForkLeft,
    ForkRight,
    RoundaboutLeft,
    RoundaboutRight,
}

impl Maneuver {
    /// Every maneuver with a localized phrase.
    pub const ALL: [Maneuver; 16] = [
        Maneuver::TurnLeft,
        Maneuver::TurnRight,
        Maneuver::TurnSlightLeft,
        Maneuver::TurnSlightRight,
        Maneuver::TurnSharpLeft,
        Maneuver::TurnSharpRight,
        Maneuver::UturnLeft,
        Maneuver::UturnRight,
        Maneuver::Straight,
        Maneuver::Merge,
        Maneuver::RampLeft,
        Maneuver::RampRight,
        Maneuver::ForkLeft,
        Maneuver::ForkRight,
        Maneuver::RoundaboutLeft,
        Maneuver::RoundaboutRight,
    ];

    /// The wire code, e.g. `turn-slight-left`.
    pub fn code(&self) -> &'static str {
        match self {
            Maneuver::TurnLeft => "turn-left",
            Maneuver::TurnRight => "turn-right",
            Maneuver::TurnSlightLeft => "turn-slight-left",
            Maneuver::TurnSlightRight => "turn-slight-right",
            Maneuver::TurnSharpLeft => "turn-sharp-left",
            Maneuver::TurnSharpRight => "turn-sharp-right",
            Maneuver::UturnLeft => "uturn-left",
            Maneuver::UturnRight => "uturn-right",
            Maneuver::Straight => "straight",
            Maneuver::Merge => "merge",
            Maneuver::RampLeft => "ramp-left",
            Maneuver::RampRight => "ramp-right",
            Maneuver::ForkLeft => "fork-left",
            Maneuver::ForkRight => "fork-right",
            Maneuver::RoundaboutLeft => "roundabout-left",
            Maneuver::RoundaboutRight => "roundabout-right",
        }
    }

    /// Looks up a wire code. Codes outside the table return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Localized phrase for this maneuver.
    pub fn phrase(&self, language: Language) -> &'static str {
        match language {
            Language::Chinese => match self {
                Maneuver::TurnLeft => "左转",
                Maneuver::TurnRight => "右转",
                Maneuver::TurnSlightLeft => "稍向左转",
                Maneuver::TurnSlightRight => "稍向右转",
                Maneuver::TurnSharpLeft => "向左急转",
                Maneuver::TurnSharpRight => "向右急转",
                Maneuver::UturnLeft => "左转掉头",
                Maneuver::UturnRight => "右转掉头",
                Maneuver::Straight => "直行",
                Maneuver::Merge => "并线",
                Maneuver::RampLeft => "左侧匝道",
                Maneuver::RampRight => "右侧匝道",
                Maneuver::ForkLeft => "左叉",
                Maneuver::ForkRight => "右叉",
                Maneuver::RoundaboutLeft => "环岛左转",
                Maneuver::RoundaboutRight => "环岛右转",
            },
            Language::English => match self {
                Maneuver::TurnLeft => "Turn left",
                Maneuver::TurnRight => "Turn right",
                Maneuver::TurnSlightLeft => "Turn slightly left",
                Maneuver::TurnSlightRight => "Turn slightly right",
                Maneuver::TurnSharpLeft => "Turn sharp left",
                Maneuver::TurnSharpRight => "Turn sharp right",
                Maneuver::UturnLeft => "Make a U-turn to the left",
                Maneuver::UturnRight => "Make a U-turn to the right",
                Maneuver::Straight => "Continue straight",
                Maneuver::Merge => "Merge",
                Maneuver::RampLeft => "Take the ramp on the left",
                Maneuver::RampRight => "Take the ramp on the right",
                Maneuver::ForkLeft => "Keep left at the fork",
                Maneuver::ForkRight => "Keep right at the fork",
                Maneuver::RoundaboutLeft => "At the roundabout, turn left",
                Maneuver::RoundaboutRight => "At the roundabout, turn right",
            },
        }
    }

    /// Icon name a step list renders for this maneuver.
    pub fn icon(&self) -> &'static str {
        match self {
            Maneuver::TurnRight => "maps.right",
            Maneuver::TurnLeft => "maps.left",
            Maneuver::TurnSlightRight => "maps.subdirectory.arrow.right",
            Maneuver::TurnSlightLeft => "maps.subdirectory.arrow.left",
            Maneuver::UturnLeft | Maneuver::UturnRight => "maps.u-turn-left",
            Maneuver::RampLeft => "maps.ramp.left",
            Maneuver::RampRight => "maps.ramp.right",
            _ => DEFAULT_ICON,
        }
    }
}

/// Icon used for straight travel and unknown maneuvers.
pub const DEFAULT_ICON: &str = "maps.straight";

/// Icon for an optional raw maneuver code.
pub fn icon_for(code: Option<&str>) -> &'static str {
    code.and_then(Maneuver::from_code)
        .map(|m| m.icon())
        .unwrap_or(DEFAULT_ICON)
}

impl FromStr for Maneuver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown maneuver '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_table() {
        for maneuver in Maneuver::ALL {
            assert_eq!(Maneuver::from_code(maneuver.code()), Some(maneuver));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(Maneuver::from_code("keep-left"), None);
        assert!("ferry".parse::<Maneuver>().is_err());
    }

    #[test]
    fn test_every_maneuver_has_both_phrases() {
        for maneuver in Maneuver::ALL {
            assert!(!maneuver.phrase(Language::Chinese).is_empty());
            assert!(!maneuver.phrase(Language::English).is_empty());
        }
    }

    #[test]
    fn test_icons() {
        assert_eq!(icon_for(Some("turn-left")), "maps.left");
        assert_eq!(icon_for(Some("uturn-right")), "maps.u-turn-left");
        assert_eq!(icon_for(Some("merge")), DEFAULT_ICON);
        assert_eq!(icon_for(Some("bogus")), DEFAULT_ICON);
        assert_eq!(icon_for(None), DEFAULT_ICON);
    }
}
