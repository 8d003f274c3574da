//! Crate containing the parameter scaling engine for locomotive powertrain
//! simulation.  A [ParameterModel](config::ParameterModel) describing the
//! vehicle, powertrain, auxiliary engine and train topology is combined with a
//! [ReferenceStore](reference::ReferenceStore) of canonical simulator curves to
//! produce the [ParameterOverride](params::ParameterOverride)s handed to an
//! external vehicle simulator.  Drive cycle handling, the simulator process
//! boundary and result post-processing live alongside.

#[macro_use]
pub mod macros;

pub mod config;
pub mod drive_cycle;
pub mod error;
pub mod imports;
pub mod params;
pub mod prelude;
pub mod reference;
pub mod results;
pub mod scaling;
pub mod si;
pub mod simulation;
pub mod traits;
pub mod uc;
pub mod units;
pub mod utils;
