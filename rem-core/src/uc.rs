//! Module providing unit constants (e.g. 1 kg) for the dimensional quantities
//! exchanged with the simulator.  Values are in SI base units.

use super::si::*;

use uom::lib::marker::PhantomData;
use uom::si::Quantity;

/// Invoking `unit_const!(R, Ratio, 1.0);` yields:
/// ```ignore
/// pub const R: Ratio = Quantity {
///    dimension: PhantomData,
///    units: PhantomData,
///    value: 1.0,
/// }
/// ```
macro_rules! unit_const {
    ($(#[$docs:meta])* $name:ident, $T:ty, $value:expr) => {
        $(#[$docs])*
        pub const $name: $T = Quantity {
            dimension: PhantomData,
            units: PhantomData,
            value: $value,
        };
    };
}

unit_const!(R, Ratio, 1.0);

unit_const!(KG, Mass, 1.0);
unit_const!(G, Mass, 1.0E-3);
unit_const!(LB, Mass, 4.535_923_7_E-1);
unit_const!(
    /// US short ton
    US_TON,
    Mass,
    9.071_847_4_E2
);
unit_const!(TONNE, Mass, 1.0E3);

unit_const!(M, Length, 1.0);
unit_const!(KM, Length, 1.0E3);
unit_const!(FT, Length, 3.048_E-1);
unit_const!(MI, Length, 1.609_344_E3);
unit_const!(M2, Area, 1.0);
unit_const!(FT2, Area, 9.290_304_E-2);

unit_const!(L, Volume, 1.0E-3);
unit_const!(GAL, Volume, 3.785_411_784_E-3);

unit_const!(S, Time, 1.0);

unit_const!(MPS, Velocity, 1.0);
unit_const!(KPH, Velocity, 1.0 / 3.6);
unit_const!(MPH, Velocity, 4.470_4_E-1);

unit_const!(RADPS, AngularVelocity, 1.0);
unit_const!(RPM, AngularVelocity, std::f64::consts::PI / 30.0);

unit_const!(NM, Torque, 1.0);
unit_const!(LBF_FT, Torque, 1.355_818);

unit_const!(W, Power, 1.0);
unit_const!(KW, Power, 1.0E3);
unit_const!(
    /// mechanical horsepower
    HP,
    Power,
    7.456_998_7_E2
);

unit_const!(J, Energy, 1.0);
unit_const!(MJ, Energy, 1.0E6);
unit_const!(WH, Energy, 3.6E3);
unit_const!(KWH, Energy, 3.6E6);
unit_const!(BTU, Energy, 0.293_071 * 3.6E3);
unit_const!(
    /// Energy content of one litre of gasoline-equivalent, using 33705 Wh per US gallon
    L_GASOLINE_EQ,
    Energy,
    33_705.0 * 3.6E3 / 3.785_411_784
);

unit_const!(F, Capacitance, 1.0);
