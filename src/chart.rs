//! Chart-ready views over the consumption model.
//!
//! Reshapes the model's aggregates into the label/dataset layout the
//! dashboard's charting library consumes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::{ConsumptionModel, Month, HOURS_PER_DAY};

/// Granularity of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewMode {
    /// One bar per month
    #[default]
    Year,
    /// One bar per day of the selected month
    Month,
    /// One bar per hour of the selected month's first day
    Day,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    fn single(labels: Vec<String>, label: &str, data: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset {
                label: label.to_string(),
                data,
            }],
        }
    }
}

/// Build the chart for `view`. `month` is ignored for the year view.
pub fn chart_data(view: ViewMode, month: Month, model: &ConsumptionModel) -> ChartData {
    match view {
        ViewMode::Year => ChartData::single(
            Month::all().map(|m| m.name().to_string()).collect(),
            "Monthly Consumption (kWh)",
            model.yearly_by_month().to_vec(),
        ),
        ViewMode::Month => ChartData::single(
            (1..=month.days()).map(|d| d.to_string()).collect(),
            "Daily Consumption (kWh)",
            model.monthly_by_day(month),
        ),
        ViewMode::Day => ChartData::single(
            (0..HOURS_PER_DAY).map(|h| format!("{h}:00")).collect(),
            "Hourly Consumption (kWh)",
            model.daily_profile(month).to_vec(),
        ),
    }
}
