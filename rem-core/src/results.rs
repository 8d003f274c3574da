//! Per-step results assembled from the simulator's output columns, and the
//! totals and fuel economy figures derived from them.

use crate::config::{FuelType, SimulationContext, TrainTopology};
use crate::imports::*;
use crate::simulation::SimulatorOutputs;
use std::io::Write;

/// Output columns read from the simulator
pub mod output_names {
    pub const TIME: &str = "sim_time_s";
    pub const VEHICLE_SPEED: &str = "sim_vehicle_speed_mps";
    pub const ENGINE_SPEED: &str = "sim_engine_speed_radps";
    pub const ENGINE_FUEL_RATE: &str = "sim_engine_fuel_rate_kgps";
    pub const ENGINE_FUEL_CUMULATIVE: &str = "sim_engine_fuel_cumulative_kg";
    pub const ENGINE_POWER: &str = "sim_engine_power_W";
    pub const FUELCELL_H2_RATE: &str = "sim_fuelcell_h2_rate_kgps";
    pub const FUELCELL_H2_CUMULATIVE: &str = "sim_fuelcell_h2_cumulative_kg";
    pub const FUELCELL_POWER: &str = "sim_fuelcell_power_W";
    pub const APU_FUEL_RATE: &str = "sim_apu_fuel_rate_kgps";
    pub const APU_FUEL_CUMULATIVE: &str = "sim_apu_fuel_cumulative_kg";
    pub const APU_POWER: &str = "sim_apu_power_W";
    pub const AESS_ON: &str = "sim_AESS_on_bool";
    pub const GHG_RATE: &str = "sim_locomotive_GHG_emissions_rate_kgps";
    pub const GHG_CUMULATIVE: &str = "sim_locomotive_GHG_emissions_cumulative_kg";
    pub const TRACTIVE_POWER: &str = "sim_tractive_power_W";
    pub const ESS_POWER: &str = "sim_ess_power_W";
    pub const GRID_ENERGY: &str = "sim_grid_energy_Wh";
}

/// Diesel density, kg/L
const DIESEL_DENSITY: f64 = 0.832;
/// Gasoline density, kg/L
const GASOLINE_DENSITY: f64 = 0.745;
/// CNG density, kg/m³
const CNG_DENSITY: f64 = 0.679;
/// LNG density, kg/L
const LNG_DENSITY: f64 = 0.45;
/// Hydrogen density, kg/m³
const H2_DENSITY: f64 = 0.0899;
/// Energy content of a gallon of diesel, Wh
const DIESEL_WH_PER_GAL: f64 = 37950.0;
/// Energy content of a gallon of gasoline, Wh
const GASOLINE_WH_PER_GAL: f64 = 33705.0;
const L_PER_GAL: f64 = 3.7854118;
/// Converts MPGe into L/km gasoline equivalent and back
const MPG_LPKM: f64 = 2.35214;

/// One simulator time step
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimResult {
    pub time: si::Time,
    pub speed: si::Velocity,
    pub engine_speed: si::AngularVelocity,
    /// engine fuel rate, or hydrogen rate for fuel cells
    pub fuel_rate: si::MassRate,
    /// engine or fuel cell power
    pub engine_power: si::Power,
    pub apu_fuel_rate: si::MassRate,
    pub apu_power: si::Power,
    pub apu_fuel: si::Mass,
    pub aess_on: bool,
    pub ghg_emissions_rate: si::MassRate,
    pub ghg_emissions: si::Mass,
    pub tractive_power: si::Power,
    /// cumulative engine fuel, or hydrogen for fuel cells
    pub total_fuel: si::Mass,
    pub distance: si::Length,
    pub ess_power: si::Power,
    /// running integral of `ess_power`
    pub ess_energy: si::Energy,
    pub grid_energy: si::Energy,
}

/// Equal-length view of the simulator outputs
struct Columns<'a> {
    outputs: &'a SimulatorOutputs,
    len: usize,
}

impl<'a> Columns<'a> {
    fn get(&self, name: &str) -> RemResult<&'a [f64]> {
        let col = self.outputs.get(name)?;
        if col.len() != self.len {
            return Err(RemError::Simulation(format!(
                "output `{name}` has {} values, `{}` has {}",
                col.len(),
                output_names::TIME,
                self.len
            )));
        }
        Ok(col)
    }
}

/// Builds one [SimResult] per simulator time step.  Distance and ESS energy
/// are integrated here; ESS power is zero for non-hybrid topologies and grid
/// energy is zero unless the train is electric.
///
/// # Errors
/// [RemError::Simulation] when an output needed by `ctx` is missing or its
/// length differs from the time column
pub fn assemble_results(
    outputs: &SimulatorOutputs,
    ctx: &SimulationContext,
) -> RemResult<Vec<SimResult>> {
    use output_names as n;
    let time = outputs.get(n::TIME)?;
    let cols = Columns {
        outputs,
        len: time.len(),
    };
    let fuel_cell = ctx.topology == TrainTopology::FuelCell;
    let zeros = vec![0.0; time.len()];

    let speed = cols.get(n::VEHICLE_SPEED)?;
    let engine_speed = cols.get(n::ENGINE_SPEED)?;
    let (fuel_rate, total_fuel, engine_power) = if fuel_cell {
        (
            cols.get(n::FUELCELL_H2_RATE)?,
            cols.get(n::FUELCELL_H2_CUMULATIVE)?,
            cols.get(n::FUELCELL_POWER)?,
        )
    } else {
        (
            cols.get(n::ENGINE_FUEL_RATE)?,
            cols.get(n::ENGINE_FUEL_CUMULATIVE)?,
            cols.get(n::ENGINE_POWER)?,
        )
    };
    let apu_fuel_rate = cols.get(n::APU_FUEL_RATE)?;
    let apu_fuel = cols.get(n::APU_FUEL_CUMULATIVE)?;
    let apu_power = cols.get(n::APU_POWER)?;
    let aess_on = cols.get(n::AESS_ON)?;
    let ghg_rate = cols.get(n::GHG_RATE)?;
    let ghg = cols.get(n::GHG_CUMULATIVE)?;
    let tractive_power = cols.get(n::TRACTIVE_POWER)?;
    let ess_power = if ctx.topology.is_hybrid() {
        cols.get(n::ESS_POWER)?
    } else {
        zeros.as_slice()
    };
    let grid_energy = if ctx.topology == TrainTopology::Electric {
        cols.get(n::GRID_ENERGY)?
    } else {
        zeros.as_slice()
    };

    let distance = integrate(time, speed)?;
    let ess_energy = integrate(time, ess_power)?;
    let kgps = |v: f64| si::MassRate::new::<si::kilogram_per_second>(v);

    Ok((0..time.len())
        .map(|i| SimResult {
            time: time[i] * uc::S,
            speed: speed[i] * uc::MPS,
            engine_speed: engine_speed[i] * uc::RADPS,
            fuel_rate: kgps(fuel_rate[i]),
            engine_power: engine_power[i] * uc::W,
            apu_fuel_rate: kgps(apu_fuel_rate[i]),
            apu_power: apu_power[i] * uc::W,
            apu_fuel: apu_fuel[i] * uc::KG,
            aess_on: aess_on[i] != 0.0,
            ghg_emissions_rate: kgps(ghg_rate[i]),
            ghg_emissions: ghg[i] * uc::KG,
            tractive_power: tractive_power[i] * uc::W,
            total_fuel: total_fuel[i] * uc::KG,
            distance: distance[i] * uc::M,
            ess_power: ess_power[i] * uc::W,
            ess_energy: ess_energy[i] * uc::J,
            grid_energy: grid_energy[i] * uc::WH,
        })
        .collect())
}

/// Writes `results` as CSV with one column per [SimResult] field, in SI base
/// units
pub fn write_results_csv<W: Write>(results: &[SimResult], wtr: W) -> RemResult<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Run totals and fuel economy
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// engine fuel, or hydrogen for fuel cells
    pub total_fuel: si::Mass,
    pub total_distance: si::Length,
    /// final cumulative ESS energy
    pub total_ess_energy: si::Energy,
    pub apu_fuel: si::Mass,
    /// APU fuel as diesel volume
    pub apu_fuel_volume: si::Volume,
    pub ghg_emissions: si::Mass,
    pub train_mass: si::Mass,
    /// train mass moved per unit mass of fuel burned, zero without fuel use
    pub load_per_fuel_mass: f64,
    /// grid energy plus ESS energy
    pub energy_consumption: si::Energy,
    /// fuel volume at the density of the fuel burned
    pub actual_fuel_volume: si::Volume,
    /// miles per gallon equivalent, zero when the train did not move
    pub mpge: f64,
    /// L/km gasoline equivalent, zero when the train did not move
    pub lpkm_equivalent: f64,
}

impl SerdeAPI for SimulationSummary {}

impl SimulationSummary {
    pub fn new(results: &[SimResult], train_mass: si::Mass, ctx: &SimulationContext) -> Self {
        let Some(last) = results.last() else {
            return Self {
                train_mass,
                ..Default::default()
            };
        };
        let max = |f: fn(&SimResult) -> f64| {
            results
                .iter()
                .map(f)
                .fold(f64::NEG_INFINITY, f64::max)
        };
        let fuel_kg = max(|r| r.total_fuel.get::<si::kilogram>());
        let distance_m = max(|r| r.distance.get::<si::meter>());
        let apu_kg = max(|r| r.apu_fuel.get::<si::kilogram>());
        let ghg_kg = max(|r| r.ghg_emissions.get::<si::kilogram>());
        let ess_j = last.ess_energy.get::<si::joule>();
        let grid_wh = last.grid_energy.get::<si::watt_hour>();

        let burned_kg = fuel_kg + apu_kg;
        let load_per_fuel_mass = if burned_kg > 0.0 {
            train_mass.get::<si::kilogram>() / burned_kg
        } else {
            0.0
        };
        let mpge = if distance_m > 0.0 {
            let miles = (distance_m * uc::M).get::<si::mile>();
            let mpge = mpg_equivalent(ctx, fuel_kg, apu_kg, ess_j, grid_wh, miles);
            if mpge.is_finite() {
                mpge
            } else {
                0.0
            }
        } else {
            0.0
        };
        log::debug!("{}", format_dbg!((fuel_kg, apu_kg, ess_j, grid_wh, mpge)));

        Self {
            total_fuel: fuel_kg * uc::KG,
            total_distance: distance_m * uc::M,
            total_ess_energy: ess_j * uc::J,
            apu_fuel: apu_kg * uc::KG,
            apu_fuel_volume: apu_kg / DIESEL_DENSITY * uc::L,
            ghg_emissions: ghg_kg * uc::KG,
            train_mass,
            load_per_fuel_mass,
            energy_consumption: grid_wh * uc::WH + ess_j * uc::J,
            actual_fuel_volume: actual_fuel_volume(ctx, fuel_kg),
            mpge,
            lpkm_equivalent: if mpge != 0.0 { MPG_LPKM / mpge } else { 0.0 },
        }
    }
}

/// Volume of `fuel_kg` of the fuel burned in `ctx`
fn actual_fuel_volume(ctx: &SimulationContext, fuel_kg: f64) -> si::Volume {
    let m3 = uc::L * 1000.0;
    if ctx.topology == TrainTopology::FuelCell {
        return fuel_kg / H2_DENSITY * m3;
    }
    match ctx.fuel_type {
        FuelType::Diesel => fuel_kg / DIESEL_DENSITY * uc::L,
        FuelType::Gas => fuel_kg / GASOLINE_DENSITY * uc::L,
        FuelType::Cng => fuel_kg / CNG_DENSITY * m3,
        FuelType::Lng => fuel_kg / LNG_DENSITY * uc::L,
    }
}

/// Miles per gallon equivalent over `miles`, counting prime-mover fuel, APU
/// diesel and net ESS energy
fn mpg_equivalent(
    ctx: &SimulationContext,
    fuel_kg: f64,
    apu_kg: f64,
    ess_j: f64,
    grid_wh: f64,
    miles: f64,
) -> f64 {
    let ess_wh = ess_j / 3600.0;
    let apu_wh = apu_kg / DIESEL_DENSITY / L_PER_GAL * DIESEL_WH_PER_GAL;
    // gasoline-equivalent Wh of methane and hydrogen fuels, per kg
    let lb_per_kg = 2.204;
    let gaseous = |lb_per_gge: f64| 0.88 * fuel_kg * lb_per_kg / lb_per_gge * GASOLINE_WH_PER_GAL;
    match ctx.topology {
        TrainTopology::FuelCell => {
            GASOLINE_WH_PER_GAL / ((gaseous(2.198) + ess_wh + apu_wh) / miles)
        }
        TrainTopology::Electric => DIESEL_WH_PER_GAL / (grid_wh / miles),
        _ => match ctx.fuel_type {
            FuelType::Diesel => {
                let fuel_wh = fuel_kg / DIESEL_DENSITY / L_PER_GAL * DIESEL_WH_PER_GAL;
                DIESEL_WH_PER_GAL / ((fuel_wh + ess_wh + apu_wh) / miles)
            }
            FuelType::Gas => {
                let fuel_wh = 0.88 * fuel_kg / GASOLINE_DENSITY / L_PER_GAL * GASOLINE_WH_PER_GAL;
                GASOLINE_WH_PER_GAL / ((fuel_wh + ess_wh + apu_wh) / miles)
            }
            FuelType::Cng => GASOLINE_WH_PER_GAL / ((gaseous(5.66) + ess_wh + apu_wh) / miles),
            FuelType::Lng => GASOLINE_WH_PER_GAL / ((gaseous(5.38) + ess_wh + apu_wh) / miles),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnergyStorageSystem;

    fn ctx(topology: TrainTopology, fuel_type: FuelType) -> SimulationContext {
        SimulationContext {
            topology,
            storage: if topology.is_hybrid() {
                EnergyStorageSystem::Battery
            } else {
                EnergyStorageSystem::None
            },
            fuel_type,
        }
    }

    /// Three steps at 0, 10 and 30 s with every shared output populated
    fn outputs() -> SimulatorOutputs {
        use output_names as n;
        let mut out = SimulatorOutputs::default();
        out.insert(n::TIME, vec![0.0, 10.0, 30.0]);
        out.insert(n::VEHICLE_SPEED, vec![0.0, 10.0, 20.0]);
        out.insert(n::ENGINE_SPEED, vec![50.0, 80.0, 90.0]);
        out.insert(n::ENGINE_FUEL_RATE, vec![0.01, 0.05, 0.06]);
        out.insert(n::ENGINE_FUEL_CUMULATIVE, vec![0.0, 0.5, 1.7]);
        out.insert(n::ENGINE_POWER, vec![1e5, 1e6, 1.2e6]);
        out.insert(n::FUELCELL_H2_RATE, vec![0.001, 0.002, 0.003]);
        out.insert(n::FUELCELL_H2_CUMULATIVE, vec![0.0, 0.02, 0.08]);
        out.insert(n::FUELCELL_POWER, vec![2e5, 3e5, 4e5]);
        out.insert(n::APU_FUEL_RATE, vec![0.0; 3]);
        out.insert(n::APU_FUEL_CUMULATIVE, vec![0.0, 0.1, 0.3]);
        out.insert(n::APU_POWER, vec![0.0; 3]);
        out.insert(n::AESS_ON, vec![1.0, 0.0, 0.0]);
        out.insert(n::GHG_RATE, vec![0.03, 0.15, 0.18]);
        out.insert(n::GHG_CUMULATIVE, vec![0.0, 1.5, 5.1]);
        out.insert(n::TRACTIVE_POWER, vec![0.0, 8e5, 9e5]);
        out.insert(n::ESS_POWER, vec![0.0, 3600.0, -1800.0]);
        out.insert(n::GRID_ENERGY, vec![0.0, 2000.0, 5000.0]);
        out
    }

    #[test]
    fn test_assemble_engine_electric() {
        let results = assemble_results(
            &outputs(),
            &ctx(TrainTopology::EngineElectric, FuelType::Diesel),
        )
        .unwrap();
        assert_eq!(results.len(), 3);
        let distance: Vec<f64> = results.iter().map(|r| r.distance.get::<si::meter>()).collect();
        assert_eq!(distance, vec![0.0, 100.0, 500.0]);
        assert_eq!(results[2].total_fuel, 1.7 * uc::KG);
        assert_eq!(results[1].engine_power, 1e6 * uc::W);
        assert!(results[0].aess_on && !results[1].aess_on);
        // no storage and no grid on an engine-electric train
        assert!(results.iter().all(|r| r.ess_power == si::Power::ZERO));
        assert!(results.iter().all(|r| r.ess_energy == si::Energy::ZERO));
        assert!(results.iter().all(|r| r.grid_energy == si::Energy::ZERO));
    }

    #[test]
    fn test_assemble_fuel_cell_uses_h2() {
        let results = assemble_results(
            &outputs(),
            &ctx(TrainTopology::FuelCell, FuelType::Diesel),
        )
        .unwrap();
        assert_eq!(results[2].total_fuel, 0.08 * uc::KG);
        assert_eq!(results[1].engine_power, 3e5 * uc::W);
        assert!(almost_eq(
            results[2].fuel_rate.get::<si::kilogram_per_second>(),
            0.003,
            None
        ));
        // 3600 W for 10 s then -1800 W for 20 s
        let ess: Vec<f64> = results.iter().map(|r| r.ess_energy.get::<si::joule>()).collect();
        assert_eq!(ess, vec![0.0, 36000.0, 0.0]);
    }

    #[test]
    fn test_assemble_missing_or_short_output() {
        let mut out = outputs();
        out.columns.remove(output_names::FUELCELL_POWER);
        assert!(assemble_results(&out, &ctx(TrainTopology::EngineElectric, FuelType::Diesel)).is_ok());
        assert!(matches!(
            assemble_results(&out, &ctx(TrainTopology::FuelCell, FuelType::Diesel)),
            Err(RemError::Simulation(msg)) if msg.contains(output_names::FUELCELL_POWER)
        ));

        let mut out = outputs();
        out.insert(output_names::TRACTIVE_POWER, vec![0.0; 2]);
        assert!(matches!(
            assemble_results(&out, &ctx(TrainTopology::EngineElectric, FuelType::Diesel)),
            Err(RemError::Simulation(_))
        ));
    }

    #[test]
    fn test_summary_diesel() {
        let ctx = ctx(TrainTopology::EngineElectric, FuelType::Diesel);
        let results = assemble_results(&outputs(), &ctx).unwrap();
        let summary = SimulationSummary::new(&results, 2000.0 * uc::KG, &ctx);

        assert_eq!(summary.total_fuel, 1.7 * uc::KG);
        assert_eq!(summary.total_distance, 500.0 * uc::M);
        assert_eq!(summary.ghg_emissions, 5.1 * uc::KG);
        assert!(almost_eq(summary.apu_fuel_volume.get::<si::liter>(), 0.3 / 0.832, None));
        assert!(almost_eq(summary.load_per_fuel_mass, 1000.0, None));
        assert!(almost_eq(summary.actual_fuel_volume.get::<si::liter>(), 1.7 / 0.832, None));
        assert_eq!(summary.energy_consumption, si::Energy::ZERO);

        let miles = 500.0 / 1609.344;
        let fuel_wh = 1.7 / 0.832 / 3.7854118 * 37950.0;
        let apu_wh = 0.3 / 0.832 / 3.7854118 * 37950.0;
        let mpge = 37950.0 / ((fuel_wh + apu_wh) / miles);
        assert!(almost_eq(summary.mpge, mpge, Some(1e-9)));
        assert!(almost_eq(summary.lpkm_equivalent, 2.35214 / mpge, Some(1e-9)));
    }

    #[test]
    fn test_summary_electric_and_cng() {
        let electric = ctx(TrainTopology::Electric, FuelType::Diesel);
        let results = assemble_results(&outputs(), &electric).unwrap();
        let summary = SimulationSummary::new(&results, 1000.0 * uc::KG, &electric);
        let miles = 500.0 / 1609.344;
        assert!(almost_eq(summary.mpge, 37950.0 / (5000.0 / miles), Some(1e-9)));
        assert!(almost_eq(
            summary.energy_consumption.get::<si::kilowatt_hour>(),
            5.0,
            None
        ));

        let cng = ctx(TrainTopology::EngineElectric, FuelType::Cng);
        let results = assemble_results(&outputs(), &cng).unwrap();
        let summary = SimulationSummary::new(&results, 1000.0 * uc::KG, &cng);
        assert!(almost_eq(
            summary.actual_fuel_volume.get::<si::cubic_meter>(),
            1.7 / 0.679,
            None
        ));
    }

    #[test]
    fn test_summary_without_motion() {
        let ctx = ctx(TrainTopology::EngineElectric, FuelType::Diesel);
        let empty = SimulationSummary::new(&[], 5.0 * uc::KG, &ctx);
        assert_eq!(empty.train_mass, 5.0 * uc::KG);
        assert_eq!(empty.mpge, 0.0);

        let mut out = outputs();
        out.insert(output_names::VEHICLE_SPEED, vec![0.0; 3]);
        out.insert(output_names::ENGINE_FUEL_CUMULATIVE, vec![0.0; 3]);
        out.insert(output_names::APU_FUEL_CUMULATIVE, vec![0.0; 3]);
        let results = assemble_results(&out, &ctx).unwrap();
        let summary = SimulationSummary::new(&results, 5.0 * uc::KG, &ctx);
        assert_eq!(summary.mpge, 0.0);
        assert_eq!(summary.lpkm_equivalent, 0.0);
        assert_eq!(summary.load_per_fuel_mass, 0.0);
    }

    #[test]
    fn test_results_csv() {
        let ctx = ctx(TrainTopology::EngineElectric, FuelType::Diesel);
        let results = assemble_results(&outputs(), &ctx).unwrap();
        let mut buf = vec![];
        write_results_csv(&results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("time,speed,engine_speed,"));
        assert_eq!(lines.count(), 3);
    }
}
