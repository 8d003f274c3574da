use super::*;
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::units::Quantity;

/// Complete user configuration of one simulation run
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterModel {
    pub vehicle: VehicleParameters,
    pub powertrain: PowertrainParameters,
    pub aux_engine: AuxEngineOptions,
    pub train_options: TrainOptions,
}

impl ParameterModel {
    pub fn context(&self) -> SimulationContext {
        self.train_options.context()
    }

    /// Named values entered by the user, in the order the simulator's
    /// parameter file expects them: vehicle, auxiliary engine, powertrain
    pub fn input_parameters(&self) -> Vec<ParameterOverride> {
        let ctx = self.context();
        let mut params = self.vehicle.input_parameters(&ctx);
        params.extend(self.aux_engine.input_parameters(&ctx));
        params.extend(self.powertrain.input_parameters(&ctx));
        params
    }

    pub fn validate(&self) -> RemResult<()> {
        self.vehicle.validate()?;
        self.aux_engine.validate()?;
        self.powertrain.validate(&self.context())
    }

    /// Applies a single `key=value` style setting, where dimensional values
    /// carry their unit, e.g. `vehicle.max_speed` = `70 mph`.
    pub fn set(&mut self, key: &str, value: &str) -> RemResult<()> {
        let quantity = || value.parse::<Quantity>();
        let number = || {
            value.trim().parse::<f64>().map_err(|_| {
                RemError::InvalidConfiguration(format!("`{key}` expects a number, got `{value}`"))
            })
        };
        match key {
            "vehicle.preset" => {
                self.vehicle = VehicleParameters::from_preset(parse_enum(key, value)?)
            }
            "vehicle.locomotive_mass" => self.vehicle.set_locomotive_mass(quantity()?)?,
            "vehicle.car_mass" => self.vehicle.set_car_mass(quantity()?)?,
            "vehicle.num_cars" => {
                let n = number()?;
                if n < 0.0 || n.fract() != 0.0 {
                    return Err(RemError::InvalidConfiguration(format!(
                        "`{key}` must be a whole number, got `{value}`"
                    )));
                }
                self.vehicle.set_num_cars(n as u32)
            }
            "vehicle.wheel_radius" => self.vehicle.set_wheel_radius(quantity()?)?,
            "vehicle.max_speed" => self.vehicle.set_max_speed(quantity()?)?,
            "vehicle.frontal_area" => self.vehicle.set_frontal_area(quantity()?)?,
            "vehicle.drag_coefficient" => self.vehicle.set_drag_coefficient(number()?),
            "vehicle.gear_ratio" => self.vehicle.set_gear_ratio(number()?),
            "vehicle.rolling_resistance_1" => {
                let (_, speed_dependent) = self.vehicle.rolling_resistance();
                self.vehicle.set_rolling_resistance(number()?, speed_dependent)
            }
            "vehicle.rolling_resistance_2" => {
                let (constant, _) = self.vehicle.rolling_resistance();
                self.vehicle.set_rolling_resistance(constant, number()?)
            }
            "train.topology" => self.train_options.set_topology(parse_enum(key, value)?),
            "train.storage_system" => self
                .train_options
                .set_storage_system(parse_enum(key, value)?)?,
            "train.fuel_type" => self.train_options.fuel_type = parse_enum(key, value)?,
            "aux.kind" => self.aux_engine.kind = parse_enum(key, value)?,
            "aux.aess" => self.aux_engine.set_aess(parse_enum::<bool>(key, value)?),
            "aux.load" => {
                self.aux_engine.load = quantity()?
                    .expect_kind(crate::units::QuantityKind::Power)?
                    .si_value()
                    * uc::W
            }
            "aux.efficiency" => self.aux_engine.efficiency = number()? * uc::R,
            _ => match key.strip_prefix("powertrain.") {
                Some(field) => match field.rsplit_once('_') {
                    Some((component, "power")) => {
                        self.powertrain.set_power(component, quantity()?)?
                    }
                    Some((component, "energy")) => {
                        self.powertrain.set_energy(component, quantity()?)?
                    }
                    Some((component, "efficiency")) => {
                        let eff = number()? * uc::R;
                        match component {
                            "engine" => self.powertrain.engine_efficiency = eff,
                            "fuel_cell" => self.powertrain.fuel_cell_efficiency = eff,
                            "generator" => self.powertrain.generator_efficiency = eff,
                            "motor" => self.powertrain.motor_efficiency = eff,
                            "final_drive" => self.powertrain.final_drive_efficiency = eff,
                            _ => return Err(unknown_key(key)),
                        }
                    }
                    _ if field == "ultracap_capacitance" => {
                        self.powertrain.ultracap_capacitance = number()? * uc::F
                    }
                    _ => return Err(unknown_key(key)),
                },
                None => return Err(unknown_key(key)),
            },
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> RemError {
    RemError::InvalidConfiguration(format!("unknown setting `{key}`"))
}

/// Parses a unit-variant enum or a bool through serde, so the accepted
/// spellings match the configuration file format
fn parse_enum<T: for<'a> Deserialize<'a>>(key: &str, value: &str) -> RemResult<T> {
    serde_yaml::from_str(value.trim()).map_err(|_| {
        RemError::InvalidConfiguration(format!("`{value}` is not a valid value for `{key}`"))
    })
}

impl SerdeAPI for ParameterModel {
    fn init(&mut self) -> RemResult<()> {
        self.train_options.init()?;
        self.validate()
    }
}
