//! Rescales the reference curves of a simulator variant to a specific vehicle
//! configuration.
//!
//! Scaling runs as a fixed sequence of stages over a [Scaler]:
//! 1. standard: motor speed, dynamic brake and motor torque curves
//! 2. hybrid (EngineHybrid and FuelCell only): energy storage sizing, run in
//!    the middle of the standard stage
//! 3. topology: prime-mover power corrections, including the engine
//!    sub-stage for engine topologies
//! 4. auxiliary (every topology except Electric): APU curves
//!
//! Later stages read values derived by earlier ones, so the order is fixed.
//! Any missing or degenerate reference value aborts the whole run and no
//! overrides are returned.

mod auxiliary;
mod engine;
mod hybrid;
mod standard;
mod topology;


use crate::config::{ParameterModel, SimulationContext, TrainTopology};
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::reference::{ConstName, ParamName, ReferenceLibrary, ReferenceStore, SimulatorVariant};
use crate::utils::nonzero;
use rayon::prelude::*;

/// Names of derived values emitted for traceability alongside the simulator
/// parameters
pub mod side_values {
    pub const REG_CORR: &str = "CalculateStandardSimParameters_reg_corr";
    pub const MAX_MC_POWER: &str = "maxMCPower";
    pub const POWER_CORR: &str = "CalculateSimulationParameters_power_corr";
    pub const POWER_CORR2: &str = "CalculateSimulationParameters_power_corr2";
    pub const ENG_POWER_CORR: &str = "CalculateEngineParameters_power_corr";
}

/// State shared by the scaling stages of one run
pub(crate) struct Scaler<'a> {
    model: &'a ParameterModel,
    ctx: SimulationContext,
    store: &'a ReferenceStore,
    out: Vec<ParameterOverride>,
}

impl<'a> Scaler<'a> {
    fn new(model: &'a ParameterModel, store: &'a ReferenceStore) -> Self {
        Self {
            model,
            ctx: model.context(),
            store,
            out: vec![],
        }
    }

    fn constant(&self, name: ConstName) -> RemResult<f64> {
        self.store.constant(name)
    }

    /// Reference constant that is about to be used as a denominator
    fn divisor(&self, name: ConstName) -> RemResult<f64> {
        nonzero(self.constant(name)?, name.as_str())
    }

    fn curve(&self, name: ParamName) -> RemResult<&'a [f64]> {
        self.store.curve(name)
    }

    fn emit(&mut self, name: ParamName, values: Vec<f64>) {
        self.out.push(ParameterOverride::new(name.as_str(), values));
    }

    fn emit_scalar(&mut self, name: ParamName, value: f64) {
        self.emit(name, vec![value]);
    }

    fn emit_side(&mut self, name: &str, values: Vec<f64>) {
        self.out.push(ParameterOverride::new(name, values));
    }

    /// Prime-mover rating in kW
    fn prime_kw(&self) -> f64 {
        self.model
            .powertrain
            .canonical_prime_power(&self.ctx)
            .get::<si::kilowatt>()
    }

    /// Energy storage rating in kW, zero without active storage
    fn ess_kw(&self) -> f64 {
        self.model
            .powertrain
            .canonical_ess_power(&self.ctx)
            .get::<si::kilowatt>()
    }

    fn run(mut self) -> RemResult<Vec<ParameterOverride>> {
        self.standard()?;
        self.topology()?;
        if self.ctx.topology != TrainTopology::Electric {
            self.auxiliary()?;
        }
        Ok(self.out)
    }
}

/// Computes every scaled override for `model` from the reference data in
/// `store`.
///
/// # Errors
/// - [RemError::InvalidConfiguration] when the topology and storage selection
///   has no simulator, or `store` was exported from a different variant
/// - [RemError::MissingReferenceData] naming the first absent constant or curve
/// - [RemError::InvalidReferenceData] on a zero denominator or mismatched curve
///   lengths
pub fn scale_parameters(
    model: &ParameterModel,
    store: &ReferenceStore,
) -> RemResult<Vec<ParameterOverride>> {
    let variant = SimulatorVariant::from_context(&model.context())?;
    if let Some(recorded) = store.variant {
        if recorded != variant {
            return Err(RemError::InvalidConfiguration(format!(
                "configuration needs {variant} reference data, got {recorded}"
            )));
        }
    }
    let overrides = Scaler::new(model, store).run()?;
    log::debug!("scaled {} parameters for {variant}", overrides.len());
    Ok(overrides)
}

/// Full parameter list handed to the simulator: the user-entered input
/// parameters followed by the scaled overrides
pub fn simulation_parameters(
    model: &ParameterModel,
    store: &ReferenceStore,
) -> RemResult<Vec<ParameterOverride>> {
    let mut params = model.input_parameters();
    params.extend(scale_parameters(model, store)?);
    Ok(params)
}

/// Scales a batch of independent configurations, each against the reference
/// store of its own variant.  Results are returned in input order.
///
/// # Arguments
/// * `parallelize` - whether to scale on the rayon thread pool
pub fn scale_many(
    models: &[ParameterModel],
    library: &ReferenceLibrary,
    parallelize: bool,
) -> Vec<RemResult<Vec<ParameterOverride>>> {
    let scale_one = |model: &ParameterModel| -> RemResult<Vec<ParameterOverride>> {
        let variant = SimulatorVariant::from_context(&model.context())?;
        simulation_parameters(model, library.get(variant)?)
    };
    if parallelize {
        models.par_iter().map(scale_one).collect()
    } else {
        models.iter().map(scale_one).collect()
    }
}
