//! # Appliance Profiles
//!
//! Named household loads layered on top of the baseline curve. Each profile
//! picks an intensity level, a set of time-of-day windows it runs in and a
//! multiplier per intensity level.
//!
//! The default catalog is built once and deep-copied into every new model, so
//! editing a model's profiles never leaks back into the catalog.

use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::calendar::Month;
use super::error::ModelError;

pub const HEATPUMP_HEATING: &str = "heatpump-heating";
pub const HEATPUMP_COOLING: &str = "heatpump-cooling";
pub const WASHING_MACHINE: &str = "washing-machine";
pub const DISHWASHER: &str = "dishwasher";
pub const ELECTRIC_VEHICLE: &str = "electric-vehicle";

/// Usage intensity of an appliance
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Intensity {
    Low,
    Average,
    High,
}

/// Named hour-of-day bucket an appliance can be scheduled in.
///
/// Buckets overlap at their edges; an hour shared by two selected windows is
/// still only counted once.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Hour-of-day indices (0..24) covered by this window
    pub fn hours(self) -> &'static [usize] {
        match self {
            Self::Morning => &[6, 7, 8, 9, 10],
            Self::Midday => &[10, 11, 12, 13, 14, 15, 16],
            Self::Evening => &[17, 18, 19, 20, 21, 22],
            Self::Night => &[22, 23, 0, 1, 2, 3, 4, 5],
        }
    }
}

/// A configurable household appliance load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceProfile {
    /// Stable identifier, used as the upsert key
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub intensity: Intensity,
    pub time_of_day: Vec<TimeOfDay>,
    /// Consumption multiplier per intensity level; must cover every level
    pub consumption_factors: BTreeMap<Intensity, f64>,
}

impl ApplianceProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        time_of_day: Vec<TimeOfDay>,
        factors: [f64; 3],
    ) -> Self {
        let [low, average, high] = factors;
        Self {
            id: id.into(),
            name: name.into(),
            enabled: false,
            intensity: Intensity::Average,
            time_of_day,
            consumption_factors: BTreeMap::from([
                (Intensity::Low, low),
                (Intensity::Average, average),
                (Intensity::High, high),
            ]),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    /// Check that the identifier is set and every intensity level has a
    /// finite, non-negative multiplier.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.trim().is_empty() {
            return Err(ModelError::EmptyIdentifier);
        }
        for intensity in Intensity::iter() {
            match self.consumption_factors.get(&intensity) {
                None => {
                    return Err(ModelError::MissingMultiplier {
                        appliance: self.id.clone(),
                        intensity,
                    })
                }
                Some(&value) if !value.is_finite() || value < 0.0 => {
                    return Err(ModelError::InvalidMultiplier {
                        appliance: self.id.clone(),
                        intensity,
                        value,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Multiplier for the currently selected intensity level
    pub fn intensity_multiplier(&self) -> Result<f64, ModelError> {
        self.consumption_factors
            .get(&self.intensity)
            .copied()
            .ok_or_else(|| ModelError::MissingMultiplier {
                appliance: self.id.clone(),
                intensity: self.intensity,
            })
    }

    /// Seasonal multiplier: heat pumps follow the heating or cooling season,
    /// everything else is flat.
    pub fn seasonal_factor(&self, month: Month) -> f64 {
        match self.id.as_str() {
            HEATPUMP_HEATING => {
                if month.is_full_winter() {
                    1.8
                } else if month.is_winter_shoulder() {
                    0.8
                } else {
                    0.2
                }
            }
            HEATPUMP_COOLING => {
                if month.is_full_summer() {
                    1.8
                } else if month.is_summer_shoulder() {
                    0.6
                } else {
                    0.1
                }
            }
            _ => 1.0,
        }
    }

    /// Laundry and dishes shift towards the weekend.
    pub fn weekend_factor(&self, weekend: bool) -> f64 {
        match self.id.as_str() {
            WASHING_MACHINE | DISHWASHER if weekend => 1.5,
            WASHING_MACHINE | DISHWASHER => 0.9,
            _ => 1.0,
        }
    }

    /// Deduplicated, ascending hours covered by the selected windows
    pub fn target_hours(&self) -> Vec<usize> {
        self.time_of_day
            .iter()
            .flat_map(|window| window.hours().iter().copied())
            .unique()
            .sorted()
            .collect()
    }
}

static DEFAULT_CATALOG: Lazy<Vec<ApplianceProfile>> = Lazy::new(|| {
    vec![
        ApplianceProfile::new(
            HEATPUMP_HEATING,
            "Heat pump (heating)",
            vec![TimeOfDay::Morning, TimeOfDay::Evening, TimeOfDay::Night],
            [0.8, 1.2, 1.6],
        ),
        ApplianceProfile::new(
            HEATPUMP_COOLING,
            "Heat pump (cooling)",
            vec![TimeOfDay::Midday, TimeOfDay::Evening],
            [0.6, 1.0, 1.4],
        ),
        ApplianceProfile::new(
            WASHING_MACHINE,
            "Washing machine",
            vec![TimeOfDay::Morning, TimeOfDay::Evening],
            [0.5, 1.0, 1.5],
        ),
        ApplianceProfile::new(
            DISHWASHER,
            "Dishwasher",
            vec![TimeOfDay::Evening],
            [0.5, 1.0, 1.5],
        ),
        ApplianceProfile::new(
            ELECTRIC_VEHICLE,
            "Electric vehicle",
            vec![TimeOfDay::Night],
            [1.0, 2.0, 3.0],
        ),
    ]
});

/// Fresh copy of the default appliance catalog, all appliances disabled.
pub fn default_catalog() -> Vec<ApplianceProfile> {
    DEFAULT_CATALOG.clone()
}
