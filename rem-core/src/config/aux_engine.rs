use super::{check_range, SimulationContext};
use crate::imports::*;
use crate::params::ParameterOverride;

/// Source of hotel/auxiliary power
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuxEngineKind {
    /// head-end power drawn from the prime mover
    #[default]
    #[serde(alias = "HEP")]
    Hep,
    /// separate auxiliary power unit
    #[serde(alias = "APU")]
    Apu,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxEngineOptions {
    pub kind: AuxEngineKind,
    /// automatic engine start-stop
    aess: bool,
    /// full rated auxiliary load
    pub load: si::Power,
    pub efficiency: si::Ratio,
    pub mechanical_accessories: si::Power,
    pub electrical_accessories: si::Power,
}

impl Default for AuxEngineOptions {
    fn default() -> Self {
        Self {
            kind: AuxEngineKind::Hep,
            aess: false,
            load: 240.0 * uc::KW,
            efficiency: 0.35 * uc::R,
            mechanical_accessories: 0.8 * uc::KW,
            electrical_accessories: 1.5 * uc::KW,
        }
    }
}

impl AuxEngineOptions {
    /// Whether AESS is in effect; always false without an auxiliary engine
    pub fn aess(&self) -> bool {
        self.aess && self.kind != AuxEngineKind::None
    }

    pub fn set_aess(&mut self, enabled: bool) {
        self.aess = enabled;
    }

    pub fn validate(&self) -> RemResult<()> {
        check_range("aux_load", self.load.get::<si::kilowatt>(), 0.0, 4000.0)?;
        check_range(
            "aux_efficiency",
            self.efficiency.get::<si::ratio>(),
            0.1,
            0.67,
        )
    }
}

impl SerdeAPI for AuxEngineOptions {
    fn init(&mut self) -> RemResult<()> {
        self.validate()
    }
}

impl InputParameters for AuxEngineOptions {
    fn input_parameters(&self, _ctx: &SimulationContext) -> Vec<ParameterOverride> {
        vec![
            ParameterOverride::scalar("aux_eff", self.efficiency.get::<si::ratio>()),
            ParameterOverride::scalar("AUXPOWER", self.load.get::<si::kilowatt>()),
            ParameterOverride::scalar(
                "accelec_init_pwr",
                self.electrical_accessories.get::<si::watt>(),
            ),
            ParameterOverride::scalar(
                "accmech_init_pwr",
                self.mechanical_accessories.get::<si::watt>(),
            ),
        ]
    }
}
