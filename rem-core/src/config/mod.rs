//! Configuration records describing the locomotive being simulated.  Each
//! record stores its values in fixed internal units and contributes named
//! input parameters to the simulator's parameter file.

mod aux_engine;
mod parameter_model;
mod powertrain;
mod train_options;
mod vehicle;

pub use aux_engine::{AuxEngineKind, AuxEngineOptions};
pub use parameter_model::ParameterModel;
pub use powertrain::PowertrainParameters;
pub use train_options::{
    EnergyStorageSystem, FuelType, SimulationContext, TrainOptions, TrainTopology,
};
pub use vehicle::{VehicleParameters, VehiclePreset};

#[cfg(test)]
mod tests;

use crate::imports::*;

/// Fails with [RemError::InvalidConfiguration] if `value` lies outside
/// `[min, max]`
pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> RemResult<()> {
    if value.is_nan() || value < min || value > max {
        Err(RemError::InvalidConfiguration(format!(
            "`{name}` = {} is outside [{}, {}]",
            value.format_eng(Some(5)),
            min,
            max
        )))
    } else {
        Ok(())
    }
}
