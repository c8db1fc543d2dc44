//! # Synthetic Consumption Model
//!
//! Splits a yearly total (kWh) into a dense 365 x 24 grid of hourly values.
//! The yearly total is distributed over months by seasonal weight, over days
//! with a small random variation and a weekend bump, and over hours with a
//! fixed daily shape. Enabled appliance profiles are layered on top.
//!
//! The grid is the only derived state. Every aggregate (per month, per day,
//! per hour) is a plain sum over it, and any change to the yearly total or the
//! appliance profiles rebuilds the whole grid.
//!
//! Regeneration draws one random factor per day. Without a seed the result is
//! not reproducible; with `GeneratorOptions::random_seed` every pass restarts
//! from the seed and the grid depends on the inputs only.
//!
//! ```rust
//! use energy_dashboard::domain::{ConsumptionModel, GeneratorOptions, Month};
//!
//! let options = GeneratorOptions { random_seed: Some(7), ..Default::default() };
//! let model = ConsumptionModel::with_options(3650.0, options).unwrap();
//!
//! let per_month = model.yearly_by_month();
//! let january_days = model.monthly_by_day(Month::January);
//! assert_eq!(per_month.len(), 12);
//! assert_eq!(january_days.len(), 31);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum::EnumCount;

use super::appliance::{default_catalog, ApplianceProfile};
use super::calendar::{is_weekend, Month, DAYS_PER_YEAR, HOURS_PER_DAY};
use super::error::ModelError;

/// Share of monthly consumption reserved for the appliance overlay
pub const DEFAULT_APPLIANCE_FRACTION: f64 = 0.4;

/// Flat monthly-to-daily divisor used by the appliance overlay.
///
/// Baseline consumption divides by the real day count instead; the overlay
/// keeps 30 for parity with existing dashboards.
const APPLIANCE_DAYS_PER_MONTH: f64 = 30.0;

const WEEKEND_FACTOR: f64 = 1.2;
const DAILY_VARIATION_MIN: f64 = 0.9;
const DAILY_VARIATION_MAX: f64 = 1.1;

pub type HourlyRow = [f64; HOURS_PER_DAY];

/// Generation knobs that are fixed for the lifetime of a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Fraction of monthly consumption handed to the appliance overlay.
    /// 0.0 disables the overlay and the baseline takes the full month.
    pub appliance_fraction: f64,
    /// Seed for the daily variation (None = seeded from entropy)
    pub random_seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            appliance_fraction: DEFAULT_APPLIANCE_FRACTION,
            random_seed: None,
        }
    }
}

impl GeneratorOptions {
    /// Baseline-only variant: no appliance overlay, baseline fraction 1.0
    pub fn baseline_only() -> Self {
        Self {
            appliance_fraction: 0.0,
            ..Default::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.appliance_fraction) {
            return Err(ModelError::InvalidApplianceFraction(self.appliance_fraction));
        }
        Ok(())
    }

    fn overlay_enabled(&self) -> bool {
        self.appliance_fraction > 0.0
    }

    /// Fresh random source for one regeneration pass. A seeded source restarts
    /// from the seed, so equal inputs give equal grids.
    fn rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Relative load of an hour within a day
pub fn hourly_factor(hour: usize) -> f64 {
    match hour {
        22..=23 | 0..=5 => 0.6, // night
        6..=8 => 1.4,           // morning peak
        17..=19 => 1.5,         // evening peak
        _ => 1.0,
    }
}

/// Household consumption model owning the hourly grid
#[derive(Debug, Clone)]
pub struct ConsumptionModel {
    yearly_consumption_kwh: f64,
    appliance_profiles: Vec<ApplianceProfile>,
    hourly: Vec<HourlyRow>,
    options: GeneratorOptions,
}

impl ConsumptionModel {
    /// Create a model with default options and the default appliance catalog
    pub fn new(yearly_consumption_kwh: f64) -> Self {
        Self::build(yearly_consumption_kwh, GeneratorOptions::default())
    }

    pub fn with_options(
        yearly_consumption_kwh: f64,
        options: GeneratorOptions,
    ) -> Result<Self, ModelError> {
        options.validate()?;
        Ok(Self::build(yearly_consumption_kwh, options))
    }

    fn build(yearly_consumption_kwh: f64, options: GeneratorOptions) -> Self {
        let mut model = Self {
            yearly_consumption_kwh,
            appliance_profiles: default_catalog(),
            hourly: empty_grid(),
            options,
        };

        if yearly_consumption_kwh > 0.0 {
            model.regenerate();
        }
        model
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    pub fn yearly_consumption(&self) -> f64 {
        self.yearly_consumption_kwh
    }

    /// Set the yearly total and rebuild the grid.
    ///
    /// The value is not validated here; negative totals are the caller's
    /// responsibility.
    pub fn set_yearly_consumption(&mut self, value: f64) {
        self.yearly_consumption_kwh = value;
        self.regenerate();
    }

    pub fn appliance_profiles(&self) -> &[ApplianceProfile] {
        &self.appliance_profiles
    }

    pub fn appliance_profile(&self, id: &str) -> Option<&ApplianceProfile> {
        self.appliance_profiles.iter().find(|p| p.id == id)
    }

    /// Insert or replace a profile by identifier.
    ///
    /// The profile is validated first; a rejected profile leaves the model
    /// untouched. The grid is rebuilt when a yearly total is set.
    pub fn update_appliance_profile(&mut self, profile: ApplianceProfile) -> Result<(), ModelError> {
        profile.validate()?;

        match self.appliance_profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.appliance_profiles.push(profile),
        }

        if self.yearly_consumption_kwh > 0.0 {
            self.regenerate();
        }
        Ok(())
    }

    /// Read-only view of the 365 x 24 grid (kWh per hour)
    pub fn hourly_grid(&self) -> &[HourlyRow] {
        &self.hourly
    }

    pub fn hourly_value(&self, day_of_year: usize, hour: usize) -> Result<f64, ModelError> {
        if hour >= HOURS_PER_DAY {
            return Err(ModelError::HourOutOfRange(hour));
        }
        Ok(self.row(day_of_year)?[hour])
    }

    /// Total consumption of one day
    pub fn day_total(&self, day_of_year: usize) -> Result<f64, ModelError> {
        Ok(self.row(day_of_year)?.iter().sum())
    }

    /// Sum over the whole grid
    pub fn total(&self) -> f64 {
        self.hourly.iter().flatten().sum()
    }

    /// Consumption per month, January first
    pub fn yearly_by_month(&self) -> [f64; Month::COUNT] {
        let mut totals = [0.0; Month::COUNT];
        for month in Month::all() {
            totals[month.ordinal()] = self
                .month_rows(month)
                .iter()
                .flat_map(|row| row.iter())
                .sum();
        }
        totals
    }

    /// Hourly values of the first day of `month`.
    ///
    /// This is a single representative day, not an average over the month.
    pub fn daily_profile(&self, month: Month) -> HourlyRow {
        self.hourly[month.first_day_of_year()]
    }

    /// Consumption per day of `month`
    pub fn monthly_by_day(&self, month: Month) -> Vec<f64> {
        self.month_rows(month)
            .iter()
            .map(|row| row.iter().sum())
            .collect()
    }

    fn row(&self, day_of_year: usize) -> Result<&HourlyRow, ModelError> {
        self.hourly
            .get(day_of_year)
            .ok_or(ModelError::DayOfYearOutOfRange(day_of_year))
    }

    fn month_rows(&self, month: Month) -> &[HourlyRow] {
        let start = month.first_day_of_year();
        &self.hourly[start..start + month.days()]
    }

    /// Rebuild the whole grid from the yearly total and appliance profiles.
    fn regenerate(&mut self) {
        let started = Instant::now();
        self.hourly = empty_grid();

        let mut rng = self.options.rng();
        let overlay = self.options.overlay_enabled();
        let appliance_fraction = self.options.appliance_fraction;
        let baseline_fraction = 1.0 - appliance_fraction;

        let mut day_offset = 0;
        for month in Month::all() {
            let monthly_consumption = self.yearly_consumption_kwh * month.share();
            let baseline_daily_average = monthly_consumption * baseline_fraction / month.days() as f64;

            for day in 0..month.days() {
                let day_of_year = day_offset + day;

                let daily_variation = rng.gen_range(DAILY_VARIATION_MIN..DAILY_VARIATION_MAX);
                let weekend = is_weekend(day_of_year);
                let weekend_factor = if weekend { WEEKEND_FACTOR } else { 1.0 };

                let baseline_daily = baseline_daily_average * daily_variation * weekend_factor;
                let baseline_hourly = baseline_daily / HOURS_PER_DAY as f64;

                for (hour, cell) in self.hourly[day_of_year].iter_mut().enumerate() {
                    *cell = baseline_hourly * hourly_factor(hour);
                }

                if overlay {
                    self.apply_profiles(
                        day_of_year,
                        month,
                        weekend,
                        monthly_consumption * appliance_fraction,
                    );
                }
            }

            day_offset += month.days();
        }

        tracing::debug!(
            yearly_kwh = self.yearly_consumption_kwh,
            enabled_appliances = self.appliance_profiles.iter().filter(|p| p.enabled).count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "regenerated hourly grid"
        );
    }

    /// Add the enabled appliances' share of one day onto its hourly cells.
    fn apply_profiles(
        &mut self,
        day_of_year: usize,
        month: Month,
        weekend: bool,
        monthly_appliance_budget: f64,
    ) {
        let enabled: Vec<&ApplianceProfile> =
            self.appliance_profiles.iter().filter(|p| p.enabled).collect();
        if enabled.is_empty() {
            return;
        }

        let per_appliance_daily =
            monthly_appliance_budget / APPLIANCE_DAYS_PER_MONTH / enabled.len() as f64;
        let row = &mut self.hourly[day_of_year];

        for profile in enabled {
            // Profiles are validated on upsert, so a missing factor only
            // shows up for catalog data and contributes nothing.
            let Ok(intensity_factor) = profile.intensity_multiplier() else {
                continue;
            };

            let daily = per_appliance_daily
                * intensity_factor
                * profile.seasonal_factor(month)
                * profile.weekend_factor(weekend);

            let hours = profile.target_hours();
            if hours.is_empty() {
                continue;
            }

            let per_hour = daily / hours.len() as f64;
            for hour in hours {
                row[hour] += per_hour;
            }
        }
    }
}

fn empty_grid() -> Vec<HourlyRow> {
    vec![[0.0; HOURS_PER_DAY]; DAYS_PER_YEAR]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appliance::{Intensity, TimeOfDay, DISHWASHER, HEATPUMP_HEATING};
    use proptest::prelude::*;

    const HOURLY_SHAPE: f64 = 23.5 / 24.0;

    fn seeded(total: f64, seed: u64) -> ConsumptionModel {
        ConsumptionModel::with_options(total, GeneratorOptions::default().seeded(seed)).unwrap()
    }

    fn baseline_only(total: f64) -> ConsumptionModel {
        ConsumptionModel::with_options(total, GeneratorOptions::baseline_only()).unwrap()
    }

    /// Expected consumption of a month without the random variation
    fn deterministic_month(total: f64, month: Month) -> f64 {
        let daily = total * month.share() / month.days() as f64;
        (0..month.days())
            .map(|d| {
                let doy = month.first_day_of_year() + d;
                let weekend = if is_weekend(doy) { WEEKEND_FACTOR } else { 1.0 };
                daily * weekend * HOURLY_SHAPE
            })
            .sum()
    }

    fn enable(model: &mut ConsumptionModel, id: &str) {
        let profile = model.appliance_profile(id).unwrap().clone().with_enabled(true);
        model.update_appliance_profile(profile).unwrap();
    }

    #[test]
    fn test_hourly_factors() {
        let shape: f64 = (0..HOURS_PER_DAY).map(hourly_factor).sum();
        assert!((shape / 24.0 - HOURLY_SHAPE).abs() < 1e-12);
        assert_eq!(hourly_factor(3), 0.6);
        assert_eq!(hourly_factor(7), 1.4);
        assert_eq!(hourly_factor(12), 1.0);
        assert_eq!(hourly_factor(18), 1.5);
        assert_eq!(hourly_factor(23), 0.6);
    }

    #[test]
    fn test_zero_total_leaves_grid_empty() {
        let model = ConsumptionModel::new(0.0);
        assert_eq!(model.hourly_grid().len(), DAYS_PER_YEAR);
        assert_eq!(model.total(), 0.0);
    }

    #[test]
    fn test_grid_shape_and_non_negative() {
        let model = seeded(3650.0, 1);
        let grid = model.hourly_grid();
        assert_eq!(grid.len(), 365);
        assert!(grid.iter().all(|row| row.len() == 24));
        assert!(grid.iter().flatten().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_january_example_within_variation_band() {
        for _ in 0..5 {
            let model = baseline_only(3650.0);
            let january = model.yearly_by_month()[0];
            let expected = deterministic_month(3650.0, Month::January);

            assert!(january >= expected * DAILY_VARIATION_MIN - 1e-9);
            assert!(january <= expected * DAILY_VARIATION_MAX + 1e-9);
            // 3650 * 1.4 / 12 = 425.8 kWh, within the +-10% band
            assert!((january - 425.83).abs() < 425.83 * 0.1);
        }
    }

    #[test]
    fn test_conservation_without_appliances() {
        let total = 5000.0;
        let model = baseline_only(total);
        let generated: f64 = model.yearly_by_month().iter().sum();
        let expected: f64 = Month::all().map(|m| deterministic_month(total, m)).sum();

        assert!(generated >= expected * DAILY_VARIATION_MIN);
        assert!(generated <= expected * DAILY_VARIATION_MAX);
        assert!((generated - total).abs() < total * 0.1);
    }

    #[test]
    fn test_default_overlay_reserves_appliance_share() {
        // Nothing enabled: only the 60 % baseline is generated
        let model = seeded(3650.0, 3);
        let expected: f64 = Month::all().map(|m| deterministic_month(3650.0, m)).sum::<f64>() * 0.6;
        let generated = model.total();
        assert!(generated >= expected * DAILY_VARIATION_MIN);
        assert!(generated <= expected * DAILY_VARIATION_MAX);
    }

    #[test]
    fn test_seeded_models_are_reproducible() {
        let a = seeded(4200.0, 42);
        let b = seeded(4200.0, 42);
        assert_eq!(a.hourly_grid(), b.hourly_grid());

        let c = seeded(4200.0, 43);
        assert_ne!(a.hourly_grid(), c.hourly_grid());
    }

    #[test]
    fn test_weekend_factor_band() {
        let model = baseline_only(3650.0);
        // day 4 is a weekday, day 5 a weekend day of the same month
        let ratio = model.day_total(5).unwrap() / model.day_total(4).unwrap();
        let low = WEEKEND_FACTOR * DAILY_VARIATION_MIN / DAILY_VARIATION_MAX;
        let high = WEEKEND_FACTOR * DAILY_VARIATION_MAX / DAILY_VARIATION_MIN;
        assert!(ratio >= low - 1e-9 && ratio <= high + 1e-9);
    }

    #[test]
    fn test_regeneration_with_seed_is_idempotent() {
        let mut model = seeded(3650.0, 12);
        let first = model.hourly_grid().to_vec();
        model.set_yearly_consumption(3650.0);
        assert_eq!(model.hourly_grid(), first.as_slice());
    }

    #[test]
    fn test_aggregates_are_consistent_with_grid() {
        let model = seeded(3650.0, 9);
        let by_month = model.yearly_by_month();
        for month in Month::all() {
            let days = model.monthly_by_day(month);
            assert_eq!(days.len(), month.days());
            let sum: f64 = days.iter().sum();
            assert!((sum - by_month[month.ordinal()]).abs() < 1e-9);
        }
        let yearly: f64 = by_month.iter().sum();
        assert!((yearly - model.total()).abs() < 1e-6);
    }

    #[test]
    fn test_daily_profile_is_first_day_of_month() {
        let model = seeded(3650.0, 11);
        let profile = model.daily_profile(Month::March);
        let first = Month::March.day_of_year(1).unwrap();
        assert_eq!(profile, model.hourly_grid()[first]);
        assert_eq!(profile.len(), 24);
    }

    #[test]
    fn test_hourly_value_range_checks() {
        let model = seeded(1000.0, 5);
        assert!(model.hourly_value(364, 23).is_ok());
        assert_eq!(model.hourly_value(365, 0), Err(ModelError::DayOfYearOutOfRange(365)));
        assert_eq!(model.hourly_value(0, 24), Err(ModelError::HourOutOfRange(24)));
        assert_eq!(model.day_total(400), Err(ModelError::DayOfYearOutOfRange(400)));
    }

    #[test]
    fn test_enabling_appliance_adds_load_in_its_windows() {
        let disabled = seeded(3650.0, 21);
        let mut enabled = seeded(3650.0, 21);
        enable(&mut enabled, DISHWASHER);

        let hours = enabled.appliance_profile(DISHWASHER).unwrap().target_hours();
        for day in 0..DAYS_PER_YEAR {
            let before: f64 = hours.iter().map(|&h| disabled.hourly_grid()[day][h]).sum();
            let after: f64 = hours.iter().map(|&h| enabled.hourly_grid()[day][h]).sum();
            assert!(after > before, "day {day} should gain dishwasher load");
        }

        // hours outside the window are untouched
        assert_eq!(disabled.hourly_grid()[0][3], enabled.hourly_grid()[0][3]);
    }

    #[test]
    fn test_appliance_daily_amount() {
        let mut model = seeded(3650.0, 8);
        let baseline = model.clone();
        enable(&mut model, HEATPUMP_HEATING);

        // January 1st: weekday, full winter, average intensity (1.2)
        let monthly = 3650.0 * Month::January.share();
        let expected = monthly * 0.4 / 30.0 * 1.2 * 1.8;
        let added = model.day_total(0).unwrap() - baseline.day_total(0).unwrap();
        assert!((added - expected).abs() < 1e-9);
    }

    #[test]
    fn test_appliance_without_windows_contributes_nothing() {
        let mut model = seeded(3650.0, 4);
        let before = model.clone();
        let mut profile = model.appliance_profile(DISHWASHER).unwrap().clone().with_enabled(true);
        profile.time_of_day.clear();
        model.update_appliance_profile(profile).unwrap();
        assert_eq!(model.hourly_grid(), before.hourly_grid());
    }

    #[test]
    fn test_upsert_replaces_known_and_appends_unknown() {
        let mut model = seeded(3650.0, 2);
        let count = model.appliance_profiles().len();

        let updated = model
            .appliance_profile(DISHWASHER)
            .unwrap()
            .clone()
            .with_enabled(true)
            .with_intensity(Intensity::High);
        model.update_appliance_profile(updated).unwrap();
        assert_eq!(model.appliance_profiles().len(), count);
        let stored = model.appliance_profile(DISHWASHER).unwrap();
        assert!(stored.enabled);
        assert_eq!(stored.intensity, Intensity::High);

        let sauna = ApplianceProfile::new("sauna", "Sauna", vec![TimeOfDay::Evening], [1.0, 2.0, 3.0]);
        model.update_appliance_profile(sauna).unwrap();
        assert_eq!(model.appliance_profiles().len(), count + 1);
        assert_eq!(model.appliance_profiles().last().unwrap().id, "sauna");
    }

    #[test]
    fn test_upsert_rejects_missing_multiplier_without_side_effects() {
        let mut model = seeded(3650.0, 2);
        let grid = model.hourly_grid().to_vec();

        let mut broken = model.appliance_profile(DISHWASHER).unwrap().clone().with_enabled(true);
        broken.consumption_factors.remove(&Intensity::Average);

        let err = model.update_appliance_profile(broken).unwrap_err();
        assert!(matches!(err, ModelError::MissingMultiplier { .. }));
        assert!(!model.appliance_profile(DISHWASHER).unwrap().enabled);
        assert_eq!(model.hourly_grid(), grid.as_slice());
    }

    #[test]
    fn test_upsert_without_total_does_not_generate() {
        let mut model = ConsumptionModel::new(0.0);
        enable(&mut model, DISHWASHER);
        assert_eq!(model.total(), 0.0);
    }

    #[test]
    fn test_clone_is_isolated() {
        let original = seeded(3650.0, 30);
        let grid = original.hourly_grid().to_vec();
        let profiles = original.appliance_profiles().to_vec();

        let mut copy = original.clone();
        copy.set_yearly_consumption(9000.0);
        enable(&mut copy, DISHWASHER);

        assert_eq!(original.yearly_consumption(), 3650.0);
        assert_eq!(original.hourly_grid(), grid.as_slice());
        assert_eq!(original.appliance_profiles(), profiles.as_slice());
        assert_ne!(copy.hourly_grid(), grid.as_slice());
    }

    #[test]
    fn test_invalid_appliance_fraction() {
        let options = GeneratorOptions {
            appliance_fraction: 1.5,
            random_seed: None,
        };
        assert_eq!(
            ConsumptionModel::with_options(100.0, options).unwrap_err(),
            ModelError::InvalidApplianceFraction(1.5)
        );
    }

    proptest! {
        #[test]
        fn prop_grid_is_non_negative_and_bounded(total in 0.0f64..100_000.0, seed in any::<u64>()) {
            let model = seeded(total, seed);
            prop_assert_eq!(model.hourly_grid().len(), DAYS_PER_YEAR);
            prop_assert!(model.hourly_grid().iter().flatten().all(|v| *v >= 0.0));
            prop_assert!(model.total() <= total * DAILY_VARIATION_MAX * WEEKEND_FACTOR + 1e-6);
        }
    }
}
