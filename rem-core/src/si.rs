//! Import uom si system and add unit constants
//! Zero values should be created using standard uom syntax ($Quantity::ZERO) after adding "use crate::imports::*"
//! Non-zero values should be created using standard uom syntax ($Quantity::new::<$unit>($value)) or multiplication syntax ($value * $UNIT_CONSTANT)

use uom::si;

pub use si::area::square_meter;
pub use si::capacitance::farad;
pub use si::energy::{joule, kilowatt_hour, watt_hour};
pub use si::f64::{
    AngularVelocity, Area, Capacitance, Energy, Length, Mass, MassRate, Power, Ratio, Time,
    Torque, Velocity, Volume,
};
pub use si::length::{meter, mile};
pub use si::mass::kilogram;
pub use si::mass_rate::kilogram_per_second;
pub use si::power::{kilowatt, watt};
pub use si::ratio::ratio;
pub use si::time::second;
pub use si::velocity::{kilometer_per_hour, meter_per_second, mile_per_hour};
pub use si::volume::{cubic_meter, liter};
