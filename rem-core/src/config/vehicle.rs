use super::check_range;
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::units::{Quantity, QuantityKind};

use super::SimulationContext;

/// Starting points for common services
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehiclePreset {
    Freight,
    #[default]
    Passenger,
    Switch,
}

/// Mass, running gear and aerodynamic description of the train.  Dimensional
/// fields are only changed through setters taking unit-tagged [Quantity]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParameters {
    locomotive_mass: si::Mass,
    /// mass of each trailing car
    car_mass: si::Mass,
    num_cars: u32,
    wheel_radius: si::Length,
    max_speed: si::Velocity,
    frontal_area: si::Area,
    drag_coefficient: f64,
    /// constant rolling resistance coefficient
    rolling_resistance_1: f64,
    /// speed-dependent rolling resistance coefficient
    rolling_resistance_2: f64,
    gear_ratio: f64,
}

impl Default for VehicleParameters {
    fn default() -> Self {
        Self::from_preset(VehiclePreset::default())
    }
}

impl VehicleParameters {
    pub fn from_preset(preset: VehiclePreset) -> Self {
        let (loco_kg, car_kg, num_cars, gear_ratio, max_kph, area_m2) = match preset {
            VehiclePreset::Freight => (190_000.0, 115_000.0, 50, 4.13, 115.0, 15.9),
            VehiclePreset::Passenger => (130_000.0, 60_000.0, 12, 2.85, 165.0, 16.1),
            VehiclePreset::Switch => (120_000.0, 27_000.0, 5, 4.13, 115.0, 15.9),
        };
        Self {
            locomotive_mass: loco_kg * uc::KG,
            car_mass: car_kg * uc::KG,
            num_cars,
            wheel_radius: 0.508 * uc::M,
            max_speed: max_kph * uc::KPH,
            frontal_area: area_m2 * uc::M2,
            drag_coefficient: 0.9388,
            rolling_resistance_1: 0.0019,
            rolling_resistance_2: 0.000015,
            gear_ratio,
        }
    }

    pub fn locomotive_mass(&self) -> si::Mass {
        self.locomotive_mass
    }

    pub fn set_locomotive_mass(&mut self, mass: Quantity) -> RemResult<()> {
        self.locomotive_mass = mass.expect_kind(QuantityKind::Mass)?.si_value() * uc::KG;
        Ok(())
    }

    pub fn car_mass(&self) -> si::Mass {
        self.car_mass
    }

    pub fn set_car_mass(&mut self, mass: Quantity) -> RemResult<()> {
        self.car_mass = mass.expect_kind(QuantityKind::Mass)?.si_value() * uc::KG;
        Ok(())
    }

    pub fn num_cars(&self) -> u32 {
        self.num_cars
    }

    pub fn set_num_cars(&mut self, num_cars: u32) {
        self.num_cars = num_cars;
    }

    /// Locomotive plus all trailing cars
    pub fn total_mass(&self) -> si::Mass {
        self.locomotive_mass + self.car_mass * self.num_cars as f64
    }

    pub fn wheel_radius(&self) -> si::Length {
        self.wheel_radius
    }

    pub fn set_wheel_radius(&mut self, radius: Quantity) -> RemResult<()> {
        self.wheel_radius = radius.expect_kind(QuantityKind::Distance)?.si_value() * uc::M;
        Ok(())
    }

    pub fn max_speed(&self) -> si::Velocity {
        self.max_speed
    }

    pub fn set_max_speed(&mut self, speed: Quantity) -> RemResult<()> {
        self.max_speed = speed.expect_kind(QuantityKind::Speed)?.si_value() * uc::MPS;
        Ok(())
    }

    pub fn frontal_area(&self) -> si::Area {
        self.frontal_area
    }

    pub fn set_frontal_area(&mut self, area: Quantity) -> RemResult<()> {
        self.frontal_area = area.expect_kind(QuantityKind::Area)?.si_value() * uc::M2;
        Ok(())
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn set_drag_coefficient(&mut self, coefficient: f64) {
        self.drag_coefficient = coefficient;
    }

    pub fn rolling_resistance(&self) -> (f64, f64) {
        (self.rolling_resistance_1, self.rolling_resistance_2)
    }

    pub fn set_rolling_resistance(&mut self, constant: f64, speed_dependent: f64) {
        self.rolling_resistance_1 = constant;
        self.rolling_resistance_2 = speed_dependent;
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    pub fn set_gear_ratio(&mut self, ratio: f64) {
        self.gear_ratio = ratio;
    }

    pub fn validate(&self) -> RemResult<()> {
        check_range(
            "locomotive_mass",
            self.locomotive_mass.get::<si::kilogram>(),
            30_000.0,
            700_000.0,
        )?;
        check_range(
            "car_mass",
            self.car_mass.get::<si::kilogram>(),
            20_000.0,
            150_000.0,
        )?;
        check_range("num_cars", self.num_cars as f64, 0.0, 450.0)?;
        check_range(
            "max_speed",
            self.max_speed.get::<si::kilometer_per_hour>(),
            15.0,
            360.0,
        )?;
        check_range(
            "frontal_area",
            self.frontal_area.get::<si::square_meter>(),
            5.0,
            20.0,
        )?;
        check_range(
            "wheel_radius",
            self.wheel_radius.get::<si::meter>(),
            0.4,
            0.6,
        )?;
        check_range("drag_coefficient", self.drag_coefficient, 0.14, 1.28)?;
        check_range(
            "rolling_resistance_1",
            self.rolling_resistance_1,
            0.0007,
            0.0034,
        )?;
        check_range(
            "rolling_resistance_2",
            self.rolling_resistance_2,
            0.0,
            0.000025,
        )?;
        check_range("gear_ratio", self.gear_ratio, 2.0, 6.0)
    }
}

impl SerdeAPI for VehicleParameters {
    fn init(&mut self) -> RemResult<()> {
        self.validate()
    }
}

impl InputParameters for VehicleParameters {
    fn input_parameters(&self, _ctx: &SimulationContext) -> Vec<ParameterOverride> {
        vec![
            ParameterOverride::scalar("veh_init_mass", self.locomotive_mass.get::<si::kilogram>()),
            ParameterOverride::scalar("veh_init_mass_cars", self.car_mass.get::<si::kilogram>()),
            ParameterOverride::scalar("veh_init_num_cars", self.num_cars as f64),
            ParameterOverride::scalar(
                "veh_init_frontal_area",
                self.frontal_area.get::<si::square_meter>(),
            ),
            ParameterOverride::scalar("veh_init_coeff_drag", self.drag_coefficient),
            ParameterOverride::scalar("wh_init_coeff_roll1", self.rolling_resistance_1),
            ParameterOverride::scalar("wh_init_coeff_roll2", self.rolling_resistance_2),
            ParameterOverride::scalar("wh_init_radius", self.wheel_radius.get::<si::meter>()),
            ParameterOverride::scalar(
                "top_speed",
                self.max_speed.get::<si::kilometer_per_hour>(),
            ),
            ParameterOverride::scalar("fd_init_ratio", self.gear_ratio),
        ]
    }
}
