use super::{CancellationToken, Simulator, SimulatorInputs};
use crate::config::ParameterModel;
use crate::drive_cycle::DriveCycle;
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::reference::{ReferenceLibrary, SimulatorVariant};
use crate::results::{assemble_results, SimResult, SimulationSummary};
use crate::scaling;

/// Everything produced by one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub variant: SimulatorVariant,
    /// parameter list handed to the simulator
    pub params: Vec<ParameterOverride>,
    /// drive cycle after AESS derivation, as simulated
    pub cycle: DriveCycle,
    pub results: Vec<SimResult>,
    pub summary: SimulationSummary,
}

impl SerdeAPI for SimulationOutcome {}

/// Validates `model`, scales its parameters, derives AESS state on a copy of
/// `cycle`, runs `simulator` and post-processes the outputs.  Every
/// configuration fault is raised before the simulator is started.
pub fn run_simulation<S: Simulator + ?Sized>(
    model: &ParameterModel,
    library: &ReferenceLibrary,
    cycle: &DriveCycle,
    simulator: &S,
    cancel: &CancellationToken,
) -> RemResult<SimulationOutcome> {
    model.validate()?;
    let ctx = model.context();
    let variant = SimulatorVariant::from_context(&ctx)?;
    let params = scaling::simulation_parameters(model, library.get(variant)?)?;

    let mut cycle = cycle.clone();
    cycle.apply_aess(&model.aux_engine, &ctx);
    let inputs = SimulatorInputs::from_drive_cycle(&cycle);
    log::info!(
        "simulating `{}` on {variant} with {} parameters",
        cycle.name,
        params.len()
    );

    let outputs = simulator.simulate(variant, &inputs, &params, cancel)?;
    let results = assemble_results(&outputs, &ctx)?;
    let summary = SimulationSummary::new(&results, model.vehicle.total_mass(), &ctx);
    log::info!(
        "simulated {} steps over {} m",
        results.len(),
        summary.total_distance.get::<si::meter>().format_eng(Some(5))
    );
    Ok(SimulationOutcome {
        variant,
        params,
        cycle,
        results,
        summary,
    })
}
