//! # Energy Dashboard
//!
//! Synthetic household electricity consumption for a browser dashboard.
//!
//! The [`domain::ConsumptionModel`] splits a yearly total into an hourly grid
//! covering a fixed 365-day year, optionally overlaid with appliance profiles,
//! and answers yearly, monthly and daily aggregate queries. The [`api`] module
//! serves those aggregates and chart-ready views over HTTP.

pub mod api;
pub mod chart;
pub mod config;
pub mod domain;
pub mod state;
pub mod telemetry;
