use super::{check_range, EnergyStorageSystem, SimulationContext, TrainTopology};
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::units::{Quantity, QuantityKind};

/// Ratings of every powertrain component the user can configure.  Only the
/// components belonging to the selected topology and storage system take part
/// in a run; the others keep their values so switching back restores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowertrainParameters {
    pub engine_power: si::Power,
    pub engine_efficiency: si::Ratio,
    pub fuel_cell_power: si::Power,
    pub fuel_cell_efficiency: si::Ratio,
    pub generator_efficiency: si::Ratio,
    pub battery_power: si::Power,
    pub battery_energy: si::Energy,
    pub flywheel_power: si::Power,
    /// kinetic energy capacity, entered in MJ
    pub flywheel_energy: si::Energy,
    pub ultracap_power: si::Power,
    pub ultracap_capacitance: si::Capacitance,
    pub motor_power: si::Power,
    pub motor_efficiency: si::Ratio,
    pub final_drive_efficiency: si::Ratio,
}

impl Default for PowertrainParameters {
    fn default() -> Self {
        Self {
            engine_power: 3000.0 * uc::KW,
            engine_efficiency: 0.47 * uc::R,
            fuel_cell_power: 1500.0 * uc::KW,
            fuel_cell_efficiency: 0.60 * uc::R,
            generator_efficiency: 0.86 * uc::R,
            battery_power: 1000.0 * uc::KW,
            battery_energy: 200.0 * uc::KWH,
            flywheel_power: 1000.0 * uc::KW,
            flywheel_energy: 37.0e6 * uc::J,
            ultracap_power: 1000.0 * uc::KW,
            ultracap_capacitance: 500.0 * uc::F,
            motor_power: 2000.0 * uc::KW,
            motor_efficiency: 0.95 * uc::R,
            final_drive_efficiency: 0.9 * uc::R,
        }
    }
}

impl PowertrainParameters {
    /// Rated power of the prime mover for the selected topology
    pub fn canonical_prime_power(&self, ctx: &SimulationContext) -> si::Power {
        match ctx.topology {
            TrainTopology::Electric => self.motor_power,
            TrainTopology::FuelCell => self.fuel_cell_power,
            TrainTopology::EngineElectric | TrainTopology::EngineHybrid => self.engine_power,
        }
    }

    /// Rated power of the energy storage system, zero when none is active
    pub fn canonical_ess_power(&self, ctx: &SimulationContext) -> si::Power {
        match ctx.active_storage() {
            EnergyStorageSystem::Battery => self.battery_power,
            EnergyStorageSystem::Flywheel => self.flywheel_power,
            EnergyStorageSystem::Ultracapacitive => self.ultracap_power,
            EnergyStorageSystem::None => si::Power::ZERO,
        }
    }

    /// Sets the power rating of the component named by `component`, one of
    /// `engine`, `fuel_cell`, `battery`, `flywheel`, `ultracap` or `motor`
    pub fn set_power(&mut self, component: &str, power: Quantity) -> RemResult<()> {
        let power = power.expect_kind(QuantityKind::Power)?.si_value() * uc::W;
        let target = match component {
            "engine" => &mut self.engine_power,
            "fuel_cell" => &mut self.fuel_cell_power,
            "battery" => &mut self.battery_power,
            "flywheel" => &mut self.flywheel_power,
            "ultracap" => &mut self.ultracap_power,
            "motor" => &mut self.motor_power,
            _ => {
                return Err(RemError::InvalidConfiguration(format!(
                    "unknown powertrain component `{component}`"
                )))
            }
        };
        *target = power;
        Ok(())
    }

    /// Sets battery or flywheel energy capacity
    pub fn set_energy(&mut self, component: &str, energy: Quantity) -> RemResult<()> {
        let energy = energy.expect_kind(QuantityKind::Energy)?.si_value() * uc::J;
        match component {
            "battery" => self.battery_energy = energy,
            "flywheel" => self.flywheel_energy = energy,
            _ => {
                return Err(RemError::InvalidConfiguration(format!(
                    "`{component}` has no energy capacity"
                )))
            }
        }
        Ok(())
    }

    /// Checks the ratings of every component active under `ctx`
    pub fn validate(&self, ctx: &SimulationContext) -> RemResult<()> {
        let kw = |p: si::Power| p.get::<si::kilowatt>();
        let eff = |r: si::Ratio| r.get::<si::ratio>();

        if ctx.topology.has_engine() {
            let min_engine = match ctx.topology {
                TrainTopology::EngineElectric => 185.0,
                _ => 250.0,
            };
            check_range("engine_power", kw(self.engine_power), min_engine, 11_000.0)?;
            check_range("engine_efficiency", eff(self.engine_efficiency), 0.1, 0.55)?;
            check_range(
                "generator_efficiency",
                eff(self.generator_efficiency),
                0.3,
                0.97,
            )?;
        }
        if ctx.topology == TrainTopology::FuelCell {
            check_range("fuel_cell_power", kw(self.fuel_cell_power), 250.0, 11_000.0)?;
            check_range(
                "fuel_cell_efficiency",
                eff(self.fuel_cell_efficiency),
                0.1,
                0.7,
            )?;
        }
        match ctx.active_storage() {
            EnergyStorageSystem::Battery => {
                check_range("battery_power", kw(self.battery_power), 200.0, 15_000.0)?;
                check_range(
                    "battery_energy",
                    self.battery_energy.get::<si::kilowatt_hour>(),
                    35.0,
                    f64::INFINITY,
                )?;
            }
            EnergyStorageSystem::Flywheel => {
                check_range("flywheel_power", kw(self.flywheel_power), 200.0, 15_000.0)?;
                check_range(
                    "flywheel_energy",
                    self.flywheel_energy.get::<si::joule>() / 1e6,
                    10.0,
                    f64::INFINITY,
                )?;
            }
            EnergyStorageSystem::Ultracapacitive => {
                check_range("ultracap_power", kw(self.ultracap_power), 200.0, 15_000.0)?;
                check_range(
                    "ultracap_capacitance",
                    self.ultracap_capacitance.get::<si::farad>(),
                    90.0,
                    f64::INFINITY,
                )?;
            }
            EnergyStorageSystem::None => {}
        }
        check_range("motor_power", kw(self.motor_power), 185.0, 11_000.0)?;
        check_range("motor_efficiency", eff(self.motor_efficiency), 0.3, 0.97)?;
        check_range(
            "final_drive_efficiency",
            eff(self.final_drive_efficiency),
            0.8,
            0.99,
        )
    }
}

impl InputParameters for PowertrainParameters {
    fn input_parameters(&self, ctx: &SimulationContext) -> Vec<ParameterOverride> {
        let (ess_energy, ess_capacitance) = match ctx.active_storage() {
            EnergyStorageSystem::Battery => (self.battery_energy.get::<si::kilowatt_hour>(), 0.0),
            EnergyStorageSystem::Flywheel => (self.flywheel_energy.get::<si::joule>() / 1e6, 0.0),
            EnergyStorageSystem::Ultracapacitive => {
                (0.0, self.ultracap_capacitance.get::<si::farad>())
            }
            EnergyStorageSystem::None => (0.0, 0.0),
        };
        vec![
            ParameterOverride::scalar("eng_eff", self.engine_efficiency.get::<si::ratio>()),
            ParameterOverride::scalar("gc_eff", self.generator_efficiency.get::<si::ratio>()),
            ParameterOverride::scalar("mc_eff", self.motor_efficiency.get::<si::ratio>()),
            ParameterOverride::scalar(
                "PRIMEPOWER",
                self.canonical_prime_power(ctx).get::<si::kilowatt>(),
            ),
            ParameterOverride::scalar("ess_energy", ess_energy),
            ParameterOverride::scalar(
                "ESSPOWER",
                self.canonical_ess_power(ctx).get::<si::kilowatt>(),
            ),
            ParameterOverride::scalar("ess_capacitance", ess_capacitance),
            ParameterOverride::scalar(
                "fd_init_eff",
                self.final_drive_efficiency.get::<si::ratio>(),
            ),
        ]
    }
}
