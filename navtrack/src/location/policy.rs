//! Battery-aware location polling policy.
//!
//! # Decision Rule
//!
//! ```text
//! optimization off ─┐
//! charging ─────────┼──► High      1000 ms  10 m  (fix timeout 10 s)
//! battery > 20% ────┘
//! otherwise ───────────► Balanced  3000 ms  30 m  (fix timeout 15 s)
//! ```
//!
//! The policy is evaluated each time position tracking (re)starts, not
//! continuously.

use std::time::Duration;

/// Battery level at or below which power saving kicks in.
pub const LOW_BATTERY_THRESHOLD: f32 = 0.20;

/// Location accuracy requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccuracyTier {
    /// Best available (GPS).
    High,
    /// Network/GPS blend.
    Balanced,
    /// Coarse, lowest power.
    Low,
}

/// Parameters for a position subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Requested accuracy.
    pub accuracy: AccuracyTier,
    /// Minimum time between updates.
    pub interval: Duration,
    /// Minimum movement between updates, in meters.
    pub min_distance_m: u32,
    /// Upper bound on waiting for a one-off position fix.
    pub fix_timeout: Duration,
}

impl PollingConfig {
    /// Responsive tier used on mains power or healthy battery.
    pub const HIGH_RESPONSIVENESS: PollingConfig = PollingConfig {
        accuracy: AccuracyTier::High,
        interval: Duration::from_millis(1000),
        min_distance_m: 10,
        fix_timeout: Duration::from_secs(10),
    };

    /// Power-saving tier used on low battery.
    pub const POWER_SAVING: PollingConfig = PollingConfig {
        accuracy: AccuracyTier::Balanced,
        interval: Duration::from_millis(3000),
        min_distance_m: 30,
        fix_timeout: Duration::from_secs(15),
    };

    /// Polling interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }

    /// True for the power-saving tier.
    pub fn is_power_saving(&self) -> bool {
        *self == Self::POWER_SAVING
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self::HIGH_RESPONSIVENESS
    }
}

/// Selects polling parameters from battery state.
///
/// `battery_level` is a fraction in [0, 1]; values outside are clamped and
/// NaN counts as empty.
pub fn select_polling_config(
    battery_optimization: bool,
    is_charging: bool,
    battery_level: f32,
) -> PollingConfig {
    let level = if battery_level.is_nan() {
        0.0
    } else {
        battery_level.clamp(0.0, 1.0)
    };

    if !battery_optimization || is_charging || level > LOW_BATTERY_THRESHOLD {
        PollingConfig::HIGH_RESPONSIVENESS
    } else {
        PollingConfig::POWER_SAVING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_battery_is_responsive() {
        let config = select_polling_config(true, false, 0.5);
        assert_eq!(config.accuracy, AccuracyTier::High);
        assert_eq!(config.interval_ms(), 1000);
        assert_eq!(config.min_distance_m, 10);
    }

    #[test]
    fn test_low_battery_saves_power() {
        let config = select_polling_config(true, false, 0.1);
        assert_eq!(config.accuracy, AccuracyTier::Balanced);
        assert_eq!(config.interval_ms(), 3000);
        assert_eq!(config.min_distance_m, 30);
        assert_eq!(config.fix_timeout, Duration::from_secs(15));
        assert!(config.is_power_saving());
    }

    #[test]
    fn test_optimization_disabled_overrides_low_battery() {
        let config = select_polling_config(false, false, 0.05);
        assert_eq!(config, PollingConfig::HIGH_RESPONSIVENESS);
    }

    #[test]
    fn test_charging_overrides_low_battery() {
        assert_eq!(
            select_polling_config(true, true, 0.05),
            PollingConfig::HIGH_RESPONSIVENESS
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(select_polling_config(true, false, 0.20).is_power_saving());
        assert!(!select_polling_config(true, false, 0.21).is_power_saving());
    }

    #[test]
    fn test_out_of_range_levels() {
        assert!(!select_polling_config(true, false, 7.0).is_power_saving());
        assert!(select_polling_config(true, false, -1.0).is_power_saving());
        assert!(select_polling_config(true, false, f32::NAN).is_power_saving());
    }
}
