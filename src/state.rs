use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domain::{ApplianceProfile, ConsumptionModel, ModelError};

/// Shared state handed to every request handler.
///
/// The model sits behind a single writer lock. Mutations hold the write lock
/// for the whole regeneration, so readers see either the old or the new grid.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    model: Arc<RwLock<ConsumptionModel>>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self, ModelError> {
        let model = ConsumptionModel::with_options(
            cfg.model.yearly_consumption_kwh,
            cfg.model.generator_options(),
        )?;
        info!(
            yearly_kwh = model.yearly_consumption(),
            appliances = model.appliance_profiles().len(),
            "consumption model initialised"
        );
        Ok(Self::from_model(cfg, model))
    }

    pub fn from_model(cfg: Config, model: ConsumptionModel) -> Self {
        Self {
            cfg,
            model: Arc::new(RwLock::new(model)),
        }
    }

    /// Run `f` against a read-locked model
    pub fn read<T>(&self, f: impl FnOnce(&ConsumptionModel) -> T) -> T {
        f(&self.model.read())
    }

    /// Independent copy of the current model
    pub fn snapshot(&self) -> ConsumptionModel {
        self.model.read().clone()
    }

    pub fn set_yearly_consumption(&self, value: f64) {
        let mut model = self.model.write();
        model.set_yearly_consumption(value);
        info!(yearly_kwh = value, "yearly consumption updated");
    }

    pub fn upsert_appliance(&self, profile: ApplianceProfile) -> Result<ApplianceProfile, ModelError> {
        let mut model = self.model.write();
        let stored = profile.clone();
        model.update_appliance_profile(profile)?;
        info!(
            appliance = %stored.id,
            enabled = stored.enabled,
            intensity = %stored.intensity,
            "appliance profile updated"
        );
        Ok(stored)
    }
}
