pub use crate::config::{
    AuxEngineKind, AuxEngineOptions, EnergyStorageSystem, FuelType, ParameterModel,
    PowertrainParameters, SimulationContext, TrainOptions, TrainTopology, VehicleParameters,
    VehiclePreset,
};
pub use crate::drive_cycle::{DriveCycle, DriveCycleInsights, DriveCycleSample};
pub use crate::error::{RemError, RemResult};
pub use crate::params::ParameterOverride;
pub use crate::reference::{ConstName, ParamName, ReferenceLibrary, ReferenceStore, SimulatorVariant};
pub use crate::results::{assemble_results, SimResult, SimulationSummary};
pub use crate::scaling::{scale_many, scale_parameters, simulation_parameters};
pub use crate::simulation::{
    run_simulation, CancellationToken, ProcessSimulator, SimulationOutcome, SimulationSession,
    Simulator, SimulatorInputs, SimulatorOutputs,
};
pub use crate::traits::SerdeAPI;
pub use crate::units::{Quantity, QuantityKind, Unit, UnitSystem};
