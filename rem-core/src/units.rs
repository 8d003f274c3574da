//! Unit-tagged scalars for user-entered quantities.  Each [QuantityKind] has
//! one canonical unit, and every conversion passes through it, so any pair of
//! units in the same family converts without an explicit pairwise table.

use crate::imports::*;
use std::str::FromStr;

/// Physical family a [Unit] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Distance,
    Mass,
    Speed,
    Power,
    Torque,
    RotationalSpeed,
    Area,
    Volume,
    Energy,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 9] = [
        Self::Distance,
        Self::Mass,
        Self::Speed,
        Self::Power,
        Self::Torque,
        Self::RotationalSpeed,
        Self::Area,
        Self::Volume,
        Self::Energy,
    ];

    /// Unit in which values of this family are stored internally
    pub fn canonical_unit(self) -> Unit {
        match self {
            Self::Distance => Unit::Km,
            Self::Mass => Unit::Kg,
            Self::Speed => Unit::Kph,
            Self::Power => Unit::Kw,
            Self::Torque => Unit::Nm,
            Self::RotationalSpeed => Unit::RadPerSec,
            Self::Area => Unit::SqM,
            Self::Volume => Unit::L,
            Self::Energy => Unit::Kwh,
        }
    }

    /// Every unit supported for this family
    pub fn units(self) -> &'static [Unit] {
        match self {
            Self::Distance => &[Unit::Km, Unit::Mi, Unit::M, Unit::Ft],
            Self::Mass => &[Unit::Kg, Unit::UsTon, Unit::Lb, Unit::G, Unit::MetricTon],
            Self::Speed => &[Unit::Kph, Unit::Mph],
            Self::Power => &[Unit::Kw, Unit::W, Unit::Hp],
            Self::Torque => &[Unit::Nm, Unit::LbfFt],
            Self::RotationalSpeed => &[Unit::RadPerSec, Unit::Rpm],
            Self::Area => &[Unit::SqM, Unit::SqFt],
            Self::Volume => &[Unit::L, Unit::Gal],
            Self::Energy => &[Unit::Kwh, Unit::Wh, Unit::Mj, Unit::LGasolineEq, Unit::Btu],
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Km,
    Mi,
    M,
    Ft,
    SqM,
    SqFt,
    Kg,
    UsTon,
    Lb,
    G,
    MetricTon,
    Kph,
    Mph,
    RadPerSec,
    Rpm,
    Nm,
    LbfFt,
    Kw,
    W,
    Hp,
    Kwh,
    Wh,
    Mj,
    /// litres of gasoline-equivalent energy
    LGasolineEq,
    Btu,
    L,
    Gal,
}

impl Unit {
    pub fn kind(self) -> QuantityKind {
        match self {
            Self::Km | Self::Mi | Self::M | Self::Ft => QuantityKind::Distance,
            Self::SqM | Self::SqFt => QuantityKind::Area,
            Self::Kg | Self::UsTon | Self::Lb | Self::G | Self::MetricTon => QuantityKind::Mass,
            Self::Kph | Self::Mph => QuantityKind::Speed,
            Self::RadPerSec | Self::Rpm => QuantityKind::RotationalSpeed,
            Self::Nm | Self::LbfFt => QuantityKind::Torque,
            Self::Kw | Self::W | Self::Hp => QuantityKind::Power,
            Self::Kwh | Self::Wh | Self::Mj | Self::LGasolineEq | Self::Btu => {
                QuantityKind::Energy
            }
            Self::L | Self::Gal => QuantityKind::Volume,
        }
    }

    /// Size of one of this unit in SI base units
    fn si_factor(self) -> f64 {
        match self {
            Self::Km => uc::KM.value,
            Self::Mi => uc::MI.value,
            Self::M => uc::M.value,
            Self::Ft => uc::FT.value,
            Self::SqM => uc::M2.value,
            Self::SqFt => uc::FT2.value,
            Self::Kg => uc::KG.value,
            Self::UsTon => uc::US_TON.value,
            Self::Lb => uc::LB.value,
            Self::G => uc::G.value,
            Self::MetricTon => uc::TONNE.value,
            Self::Kph => uc::KPH.value,
            Self::Mph => uc::MPH.value,
            Self::RadPerSec => uc::RADPS.value,
            Self::Rpm => uc::RPM.value,
            Self::Nm => uc::NM.value,
            Self::LbfFt => uc::LBF_FT.value,
            Self::Kw => uc::KW.value,
            Self::W => uc::W.value,
            Self::Hp => uc::HP.value,
            Self::Kwh => uc::KWH.value,
            Self::Wh => uc::WH.value,
            Self::Mj => uc::MJ.value,
            Self::LGasolineEq => uc::L_GASOLINE_EQ.value,
            Self::Btu => uc::BTU.value,
            Self::L => uc::L.value,
            Self::Gal => uc::GAL.value,
        }
    }

    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Mi => "mi",
            Self::M => "m",
            Self::Ft => "ft",
            Self::SqM => "m²",
            Self::SqFt => "ft²",
            Self::Kg => "kg",
            Self::UsTon => "ton",
            Self::Lb => "lb",
            Self::G => "g",
            Self::MetricTon => "t",
            Self::Kph => "km/h",
            Self::Mph => "MPH",
            Self::RadPerSec => "rad/s",
            Self::Rpm => "rpm",
            Self::Nm => "N·m",
            Self::LbfFt => "lbf-ft",
            Self::Kw => "kW",
            Self::W => "W",
            Self::Hp => "hp",
            Self::Kwh => "kWh",
            Self::Wh => "Wh",
            Self::Mj => "MJ",
            Self::LGasolineEq => "L",
            Self::Btu => "BTU",
            Self::L => "L",
            Self::Gal => "gal",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = RemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "km" => Self::Km,
            "mi" | "mile" | "miles" => Self::Mi,
            "m" => Self::M,
            "ft" => Self::Ft,
            "m2" | "m²" | "sqm" => Self::SqM,
            "ft2" | "ft²" | "sqft" => Self::SqFt,
            "kg" => Self::Kg,
            "ton" | "uston" => Self::UsTon,
            "lb" | "lbs" => Self::Lb,
            "g" => Self::G,
            "t" | "tonne" | "metricton" => Self::MetricTon,
            "kph" | "km/h" => Self::Kph,
            "mph" => Self::Mph,
            "rad/s" | "radps" => Self::RadPerSec,
            "rpm" => Self::Rpm,
            "nm" | "n·m" | "n-m" => Self::Nm,
            "lbf-ft" | "lbft" => Self::LbfFt,
            "kw" => Self::Kw,
            "w" => Self::W,
            "hp" => Self::Hp,
            "kwh" => Self::Kwh,
            "wh" => Self::Wh,
            "mj" => Self::Mj,
            "lge" | "l_gasoline_eq" => Self::LGasolineEq,
            "btu" => Self::Btu,
            "l" => Self::L,
            "gal" => Self::Gal,
            _ => {
                return Err(RemError::InvalidUnit {
                    unit: s.to_string(),
                    kind: "any quantity".into(),
                })
            }
        })
    }
}

/// Converts `value` expressed in `from` into `to`, passing through the
/// canonical unit of the shared family.
///
/// # Errors
/// [RemError::InvalidUnit] when `from` and `to` belong to different families
pub fn convert(value: f64, from: Unit, to: Unit) -> RemResult<f64> {
    if from.kind() != to.kind() {
        return Err(RemError::InvalidUnit {
            unit: to.label().into(),
            kind: from.kind().to_string(),
        });
    }
    let canonical = from.kind().canonical_unit();
    let in_canonical = value * from.si_factor() / canonical.si_factor();
    Ok(in_canonical * canonical.si_factor() / to.si_factor())
}

/// Scalar tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Builds a quantity after checking that `unit` belongs to `kind`
    pub fn of_kind(kind: QuantityKind, value: f64, unit: Unit) -> RemResult<Self> {
        Self::new(value, unit).expect_kind(kind)
    }

    pub fn kind(&self) -> QuantityKind {
        self.unit.kind()
    }

    /// Returns `self` if it belongs to `kind`
    pub fn expect_kind(self, kind: QuantityKind) -> RemResult<Self> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Err(RemError::InvalidUnit {
                unit: self.unit.label().into(),
                kind: kind.to_string(),
            })
        }
    }

    /// Value expressed in the family's canonical unit
    pub fn canonical_value(&self) -> f64 {
        self.value * self.unit.si_factor() / self.kind().canonical_unit().si_factor()
    }

    /// Value expressed in `unit`
    pub fn value_in(&self, unit: Unit) -> RemResult<f64> {
        convert(self.value, self.unit, unit)
    }

    /// Value in SI base units, for handing to `uom` quantities
    pub(crate) fn si_value(&self) -> f64 {
        self.value * self.unit.si_factor()
    }

    /// Builds a quantity in `unit` from a value given in SI base units
    pub(crate) fn from_si(si_value: f64, unit: Unit) -> Self {
        Self::new(si_value / unit.si_factor(), unit)
    }
}

impl FromStr for Quantity {
    type Err = RemError;

    /// Parses a value followed by a unit label, e.g. `70 mph` or `120000kg`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_whitespace() || (c.is_alphabetic() && !matches!(c, 'e' | 'E')))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (value, unit) = s.split_at(split);
        let value = value.parse::<f64>().map_err(|_| {
            RemError::InvalidConfiguration(format!("cannot parse a number from `{s}`"))
        })?;
        Ok(Self::new(value, unit.parse()?))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "{:.*} {}", precision, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

/// Unit and label used to present one family of quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDescription {
    pub unit: Unit,
    pub label: &'static str,
}

impl From<Unit> for UnitDescription {
    fn from(unit: Unit) -> Self {
        Self {
            unit,
            label: unit.label(),
        }
    }
}

/// Selects the display unit of every quantity family
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Us,
}

impl UnitSystem {
    pub fn description(self, kind: QuantityKind) -> UnitDescription {
        let unit = match (self, kind) {
            (Self::Metric, QuantityKind::Distance) => Unit::Km,
            (Self::Us, QuantityKind::Distance) => Unit::Mi,
            (Self::Metric, QuantityKind::Area) => Unit::SqM,
            (Self::Us, QuantityKind::Area) => Unit::SqFt,
            (Self::Metric, QuantityKind::Mass) => Unit::Kg,
            (Self::Us, QuantityKind::Mass) => Unit::Lb,
            (Self::Metric, QuantityKind::Volume) => Unit::L,
            (Self::Us, QuantityKind::Volume) => Unit::Gal,
            (_, QuantityKind::Energy) => Unit::Kwh,
            (_, QuantityKind::Power) => Unit::Kw,
            (Self::Metric, QuantityKind::Speed) => Unit::Kph,
            (Self::Us, QuantityKind::Speed) => Unit::Mph,
            (Self::Metric, QuantityKind::Torque) => Unit::Nm,
            (Self::Us, QuantityKind::Torque) => Unit::LbfFt,
            (Self::Metric, QuantityKind::RotationalSpeed) => Unit::RadPerSec,
            (Self::Us, QuantityKind::RotationalSpeed) => Unit::Rpm,
        };
        unit.into()
    }

    /// Unit for short lengths such as wheel radius
    pub fn short_distance(self) -> UnitDescription {
        match self {
            Self::Metric => Unit::M.into(),
            Self::Us => Unit::Ft.into(),
        }
    }

    /// Unit for shaft power; electrical power stays in kW in both systems
    pub fn mechanical_power(self) -> UnitDescription {
        match self {
            Self::Metric => Unit::Kw.into(),
            Self::Us => Unit::Hp.into(),
        }
    }

    /// Expresses a canonical-unit value of `kind` in this system's display unit
    pub fn display(self, kind: QuantityKind, canonical_value: f64) -> RemResult<Quantity> {
        let unit = self.description(kind).unit;
        Ok(Quantity::new(
            convert(canonical_value, kind.canonical_unit(), unit)?,
            unit,
        ))
    }

    /// Expresses a value in SI base units in this system's display unit
    pub fn display_si(self, kind: QuantityKind, si_value: f64) -> Quantity {
        Quantity::from_si(si_value, self.description(kind).unit)
    }
}

impl FromStr for UnitSystem {
    type Err = RemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(Self::Metric),
            "us" | "imperial" => Ok(Self::Us),
            _ => Err(RemError::InvalidConfiguration(format!(
                "unknown unit system `{s}`"
            ))),
        }
    }
}
