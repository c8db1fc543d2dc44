use thiserror::Error;

use super::appliance::Intensity;
use super::calendar::Month;

/// Errors raised by the consumption model and its static tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("day {day} is out of range for {month} (1..={days})", days = .month.days())]
    DayOutOfRange { month: Month, day: u32 },

    #[error("day of year {0} is out of range (0..365)")]
    DayOfYearOutOfRange(usize),

    #[error("hour {0} is out of range (0..24)")]
    HourOutOfRange(usize),

    #[error("appliance '{appliance}' has no consumption multiplier for intensity {intensity}")]
    MissingMultiplier {
        appliance: String,
        intensity: Intensity,
    },

    #[error("appliance '{appliance}' has invalid multiplier {value} for intensity {intensity}")]
    InvalidMultiplier {
        appliance: String,
        intensity: Intensity,
        value: f64,
    },

    #[error("appliance identifier must not be empty")]
    EmptyIdentifier,

    #[error("appliance fraction {0} must lie within [0, 1]")]
    InvalidApplianceFraction(f64),
}
