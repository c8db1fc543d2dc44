//! # Calendar & Seasonal Weighting
//!
//! Static tables describing the fixed, non-leap year used by the consumption
//! model: twelve months with their day counts and the relative seasonal weight
//! each month carries when the yearly total is split up.
//!
//! February always has 28 days. Day-of-week is derived from the day-of-year
//! modulo 7, so January 1st is weekday index 0 in every generated year.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator};

use super::error::ModelError;

pub const DAYS_PER_YEAR: usize = 365;
pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Calendar month, ordinal order matches calendar order (January = 0).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    EnumCount,
    FromRepr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

/// Day counts per month, indexed by ordinal.
const DAYS_IN_MONTH: [usize; Month::COUNT] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Relative seasonal intensity per month, indexed by ordinal.
///
/// Winter months carry the heating load, midsummer a smaller cooling bump.
const MONTHLY_WEIGHTS: [f64; Month::COUNT] = [
    1.4, // January
    1.3, // February
    1.1, // March
    0.9, // April
    0.8, // May
    0.7, // June
    0.8, // July
    0.9, // August
    0.8, // September
    0.9, // October
    1.1, // November
    1.3, // December
];

impl Month {
    /// Zero-based ordinal (January = 0)
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        u8::try_from(ordinal).ok().and_then(Self::from_repr)
    }

    /// Display name, e.g. `"January"`
    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Number of days in this month (no leap years)
    pub fn days(self) -> usize {
        DAYS_IN_MONTH[self.ordinal()]
    }

    /// Zero-based day-of-year of this month's first day
    pub fn first_day_of_year(self) -> usize {
        DAYS_IN_MONTH[..self.ordinal()].iter().sum()
    }

    /// Map a 1-based day of this month onto the zero-based day-of-year (0..365).
    pub fn day_of_year(self, day: u32) -> Result<usize, ModelError> {
        let index = day as usize;
        if index == 0 || index > self.days() {
            return Err(ModelError::DayOutOfRange { month: self, day });
        }
        Ok(self.first_day_of_year() + index - 1)
    }

    /// Seasonal weight of this month
    pub fn weight(self) -> f64 {
        MONTHLY_WEIGHTS[self.ordinal()]
    }

    /// Fraction of the yearly total attributed to this month.
    ///
    /// Shares of all twelve months sum to 1.
    pub fn share(self) -> f64 {
        self.weight() / total_weight()
    }

    /// Heating-season tier used by the appliance overlay
    pub fn is_full_winter(self) -> bool {
        let m = self.ordinal();
        m < 3 || m > 9
    }

    pub fn is_winter_shoulder(self) -> bool {
        let m = self.ordinal();
        !self.is_full_winter() && (m < 5 || m > 8)
    }

    /// Cooling-season tier used by the appliance overlay
    pub fn is_full_summer(self) -> bool {
        let m = self.ordinal();
        m > 4 && m < 9
    }

    pub fn is_summer_shoulder(self) -> bool {
        let m = self.ordinal();
        !self.is_full_summer() && m > 2 && m < 11
    }

    pub fn all() -> impl Iterator<Item = Month> {
        Self::iter()
    }
}

/// Normalization denominator: the sum of all monthly weights.
pub fn total_weight() -> f64 {
    MONTHLY_WEIGHTS.iter().sum()
}

/// Month containing the given zero-based day-of-year.
pub fn month_of_day(day_of_year: usize) -> Result<Month, ModelError> {
    if day_of_year >= DAYS_PER_YEAR {
        return Err(ModelError::DayOfYearOutOfRange(day_of_year));
    }
    let mut offset = 0;
    for month in Month::iter() {
        offset += month.days();
        if day_of_year < offset {
            return Ok(month);
        }
    }
    Err(ModelError::DayOfYearOutOfRange(day_of_year))
}

/// Weekday index (0..7) of a day-of-year; 5 and 6 are the weekend.
pub fn day_of_week(day_of_year: usize) -> usize {
    day_of_year % DAYS_PER_WEEK
}

pub fn is_weekend(day_of_year: usize) -> bool {
    matches!(day_of_week(day_of_year), 5 | 6)
}
