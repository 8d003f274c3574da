//! Boundary to the external vehicle simulator.  A run writes the drive cycle
//! inputs and the parameter list into a scoped [SimulationSession], invokes
//! one of the pre-built simulator executables and reads its named output
//! columns back.

mod io;
mod process;
mod run;
mod session;


pub use io::{input_names, SimulatorInputs, SimulatorOutputs};
pub use process::{ProcessSimulator, EXE_SUFFIX};
pub use run::{run_simulation, SimulationOutcome};
pub use session::SimulationSession;

use crate::imports::*;
use crate::params::ParameterOverride;
use crate::reference::SimulatorVariant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag used to abort a running simulation from another thread
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Anything that can turn simulator inputs and a parameter list into named
/// output columns
pub trait Simulator {
    /// Runs `variant` over `inputs` with `params` applied.  Long running;
    /// implementations check `cancel` while waiting and return
    /// [RemError::Cancelled] once it is set.
    fn simulate(
        &self,
        variant: SimulatorVariant,
        inputs: &SimulatorInputs,
        params: &[ParameterOverride],
        cancel: &CancellationToken,
    ) -> RemResult<SimulatorOutputs>;
}
