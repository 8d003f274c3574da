//! Read-only reference curves and constants of the simulator variants.  A
//! [ReferenceStore] is loaded once per variant and never mutated by the
//! scaling engine.

mod names;
#[cfg(test)]
pub(crate) mod mock;

pub use names::{ConstName, ParamName};

use crate::config::{EnergyStorageSystem, SimulationContext, TrainTopology};
use crate::imports::*;

/// Pre-built simulator executables, one per topology and storage pairing.
/// The serialized name is also the executable's file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulatorVariant {
    EngineElectric,
    Electric,
    EngineHybridBattery,
    EngineHybridFlywheel,
    EngineHybridUltracapacitor,
    FuelCellHybridBattery,
    FuelCellHybridFlywheel,
    FuelCellHybridUltracapacitor,
}

impl SimulatorVariant {
    pub const ALL: [SimulatorVariant; 8] = [
        Self::EngineElectric,
        Self::Electric,
        Self::EngineHybridBattery,
        Self::EngineHybridFlywheel,
        Self::EngineHybridUltracapacitor,
        Self::FuelCellHybridBattery,
        Self::FuelCellHybridFlywheel,
        Self::FuelCellHybridUltracapacitor,
    ];

    /// Maps a topology and storage selection onto its simulator
    ///
    /// # Errors
    /// [RemError::InvalidConfiguration] for a hybrid topology without storage
    pub fn from_context(ctx: &SimulationContext) -> RemResult<Self> {
        use EnergyStorageSystem as Ess;
        Ok(match (ctx.topology, ctx.storage) {
            (TrainTopology::EngineElectric, _) => Self::EngineElectric,
            (TrainTopology::Electric, _) => Self::Electric,
            (TrainTopology::EngineHybrid, Ess::Battery) => Self::EngineHybridBattery,
            (TrainTopology::EngineHybrid, Ess::Flywheel) => Self::EngineHybridFlywheel,
            (TrainTopology::EngineHybrid, Ess::Ultracapacitive) => Self::EngineHybridUltracapacitor,
            (TrainTopology::FuelCell, Ess::Battery) => Self::FuelCellHybridBattery,
            (TrainTopology::FuelCell, Ess::Flywheel) => Self::FuelCellHybridFlywheel,
            (TrainTopology::FuelCell, Ess::Ultracapacitive) => Self::FuelCellHybridUltracapacitor,
            (topology, Ess::None) => {
                return Err(RemError::InvalidConfiguration(format!(
                    "topology {topology:?} requires an energy storage system"
                )))
            }
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EngineElectric => "ENGINE_ELECTRIC",
            Self::Electric => "ELECTRIC",
            Self::EngineHybridBattery => "ENGINE_HYBRID_BATTERY",
            Self::EngineHybridFlywheel => "ENGINE_HYBRID_FLYWHEEL",
            Self::EngineHybridUltracapacitor => "ENGINE_HYBRID_ULTRACAPACITOR",
            Self::FuelCellHybridBattery => "FUEL_CELL_HYBRID_BATTERY",
            Self::FuelCellHybridFlywheel => "FUEL_CELL_HYBRID_FLYWHEEL",
            Self::FuelCellHybridUltracapacitor => "FUEL_CELL_HYBRID_ULTRACAPACITOR",
        }
    }
}

impl fmt::Display for SimulatorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named curves and scalar constants of one simulator variant
#[readonly::make]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceStore {
    /// variant the data was exported from, if recorded
    pub variant: Option<SimulatorVariant>,
    pub constants: BTreeMap<String, f64>,
    pub curves: BTreeMap<String, Vec<f64>>,
}

impl ReferenceStore {
    pub fn new(variant: SimulatorVariant) -> Self {
        Self {
            variant: Some(variant),
            ..Default::default()
        }
    }

    pub fn with_constant(mut self, name: ConstName, value: f64) -> Self {
        self.constants.insert(name.as_str().to_string(), value);
        self
    }

    pub fn with_curve(mut self, name: ParamName, values: Vec<f64>) -> Self {
        self.curves.insert(name.as_str().to_string(), values);
        self
    }

    /// # Errors
    /// [RemError::MissingReferenceData] naming the constant when absent
    pub fn constant(&self, name: ConstName) -> RemResult<f64> {
        self.constants
            .get(name.as_str())
            .copied()
            .ok_or_else(|| RemError::MissingReferenceData(name.to_string()))
    }

    /// # Errors
    /// [RemError::MissingReferenceData] naming the curve when absent
    pub fn curve(&self, name: ParamName) -> RemResult<&[f64]> {
        self.curves
            .get(name.as_str())
            .map(Vec::as_slice)
            .ok_or_else(|| RemError::MissingReferenceData(name.to_string()))
    }

    /// Path of the reference file for `variant` in `dir` with extension `ext`
    pub fn file_path<P: AsRef<Path>>(dir: P, variant: SimulatorVariant, ext: &str) -> PathBuf {
        dir.as_ref().join(format!("{variant}_reference.{ext}"))
    }

    /// Loads `<dir>/<VARIANT>_reference.{yaml,yml,json}`, whichever exists first
    pub fn from_dir<P: AsRef<Path>>(dir: P, variant: SimulatorVariant) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let path = ["yaml", "yml", "json"]
            .iter()
            .map(|ext| Self::file_path(dir, variant, ext))
            .find(|p| p.exists())
            .with_context(|| format!("no reference file for {variant} in {dir:?}"))?;
        let mut store = Self::from_file(&path, false)
            .with_context(|| format!("failed to load reference data from {path:?}"))?;
        match store.variant {
            Some(recorded) if recorded != variant => bail!(
                "{path:?} holds reference data for {recorded}, expected {variant}"
            ),
            _ => store.variant = Some(variant),
        }
        log::debug!(
            "loaded {} constants and {} curves for {variant}",
            store.constants.len(),
            store.curves.len()
        );
        Ok(store)
    }
}

impl SerdeAPI for ReferenceStore {
    fn init(&mut self) -> RemResult<()> {
        if let Some((name, value)) = self.constants.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RemError::InvalidReferenceData(format!(
                "constant `{name}` is {value}"
            )));
        }
        for (name, values) in &self.curves {
            if values.is_empty() {
                return Err(RemError::InvalidReferenceData(format!(
                    "curve `{name}` is empty"
                )));
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(RemError::InvalidReferenceData(format!(
                    "curve `{name}` has non-finite value at index {i}"
                )));
            }
        }
        Ok(())
    }
}

/// Reference stores of every variant found in a directory
#[derive(Debug, Default, Clone)]
pub struct ReferenceLibrary {
    stores: BTreeMap<SimulatorVariant, ReferenceStore>,
}

impl ReferenceLibrary {
    /// Eagerly loads every variant that has a reference file in `dir`.
    /// Variants without a file are skipped; a file that fails to load is an
    /// error.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        ensure!(dir.is_dir(), "reference directory {dir:?} does not exist");
        let mut stores = BTreeMap::new();
        for variant in SimulatorVariant::ALL {
            let present = ["yaml", "yml", "json"]
                .iter()
                .any(|ext| ReferenceStore::file_path(dir, variant, ext).exists());
            if present {
                stores.insert(variant, ReferenceStore::from_dir(dir, variant)?);
            } else {
                log::debug!("no reference data for {variant} in {dir:?}");
            }
        }
        log::info!("loaded reference data for {} variants", stores.len());
        Ok(Self { stores })
    }

    pub fn insert(&mut self, variant: SimulatorVariant, store: ReferenceStore) {
        self.stores.insert(variant, store);
    }

    /// # Errors
    /// [RemError::MissingReferenceData] when no store was loaded for `variant`
    pub fn get(&self, variant: SimulatorVariant) -> RemResult<&ReferenceStore> {
        self.stores
            .get(&variant)
            .ok_or_else(|| RemError::MissingReferenceData(format!("{variant} reference store")))
    }

    pub fn variants(&self) -> impl Iterator<Item = SimulatorVariant> + '_ {
        self.stores.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuelType;

    #[test]
    fn test_variant_from_context() {
        let ctx = |topology, storage| SimulationContext {
            topology,
            storage,
            fuel_type: FuelType::Diesel,
        };
        assert_eq!(
            SimulatorVariant::from_context(&ctx(
                TrainTopology::FuelCell,
                EnergyStorageSystem::Ultracapacitive
            ))
            .unwrap(),
            SimulatorVariant::FuelCellHybridUltracapacitor
        );
        assert_eq!(
            SimulatorVariant::from_context(&ctx(
                TrainTopology::Electric,
                EnergyStorageSystem::None
            ))
            .unwrap(),
            SimulatorVariant::Electric
        );
        assert!(matches!(
            SimulatorVariant::from_context(&ctx(
                TrainTopology::EngineHybrid,
                EnergyStorageSystem::None
            )),
            Err(RemError::InvalidConfiguration(_))
        ));
        assert_eq!(
            SimulatorVariant::EngineHybridFlywheel.to_string(),
            "ENGINE_HYBRID_FLYWHEEL"
        );
        assert_eq!(
            serde_yaml::from_str::<SimulatorVariant>("FUEL_CELL_HYBRID_BATTERY").unwrap(),
            SimulatorVariant::FuelCellHybridBattery
        );
    }

    #[test]
    fn test_lookup() {
        let store = ReferenceStore::new(SimulatorVariant::Electric)
            .with_constant(ConstName::max_mc_spd_index, 250.0)
            .with_curve(ParamName::apu_pwr_index, vec![0.0, 1.0]);
        assert_eq!(store.constant(ConstName::max_mc_spd_index).unwrap(), 250.0);
        assert_eq!(store.curve(ParamName::apu_pwr_index).unwrap(), &[0.0, 1.0]);
        match store.constant(ConstName::mean_mc_eff) {
            Err(RemError::MissingReferenceData(name)) => assert_eq!(name, "mean_mc_eff"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(store.curve(ParamName::apu_fuel_rate).is_err());
    }

    #[test]
    fn test_validated_on_load() {
        let yaml = "constants:\n  max_mc_pwr: .nan\n";
        assert!(ReferenceStore::from_yaml(yaml, false).is_err());
        let yaml = "curves:\n  apu_pwr_index: []\n";
        assert!(ReferenceStore::from_yaml(yaml, false).is_err());
        let yaml = "constants:\n  max_mc_pwr: 1.0e6\ncurves:\n  apu_pwr_index: [0, 2.5e5]\n";
        let store = ReferenceStore::from_yaml(yaml, false).unwrap();
        assert_eq!(store.constant(ConstName::max_mc_pwr).unwrap(), 1.0e6);
    }

    #[test]
    fn test_library_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(SimulatorVariant::EngineElectric)
            .with_constant(ConstName::max_eng_power, 3.0e6);
        store
            .to_file(ReferenceStore::file_path(
                dir.path(),
                SimulatorVariant::EngineElectric,
                "yaml",
            ))
            .unwrap();
        let mut electric = ReferenceStore::default();
        electric.constants.insert("max_mc_pwr".into(), 2.0e6);
        electric
            .to_file(ReferenceStore::file_path(
                dir.path(),
                SimulatorVariant::Electric,
                "json",
            ))
            .unwrap();

        let lib = ReferenceLibrary::load_dir(dir.path()).unwrap();
        assert_eq!(lib.variants().count(), 2);
        assert_eq!(lib.get(SimulatorVariant::EngineElectric).unwrap(), &store);
        assert_eq!(
            lib.get(SimulatorVariant::Electric).unwrap().variant,
            Some(SimulatorVariant::Electric)
        );
        assert!(lib.get(SimulatorVariant::FuelCellHybridBattery).is_err());

        store
            .to_file(ReferenceStore::file_path(
                dir.path(),
                SimulatorVariant::FuelCellHybridFlywheel,
                "yaml",
            ))
            .unwrap();
        assert!(ReferenceLibrary::load_dir(dir.path()).is_err());
    }
}
