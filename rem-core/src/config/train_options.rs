use crate::imports::*;

/// Prime-mover and drivetrain architecture
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainTopology {
    #[default]
    EngineElectric,
    EngineHybrid,
    Electric,
    FuelCell,
}

impl TrainTopology {
    /// Topologies that carry an energy storage system
    pub fn is_hybrid(self) -> bool {
        matches!(self, Self::EngineHybrid | Self::FuelCell)
    }

    /// Topologies burning fuel in an engine
    pub fn has_engine(self) -> bool {
        matches!(self, Self::EngineElectric | Self::EngineHybrid)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyStorageSystem {
    Battery,
    Flywheel,
    Ultracapacitive,
    #[default]
    None,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[default]
    Diesel,
    Gas,
    #[serde(alias = "CNG")]
    Cng,
    #[serde(alias = "LNG")]
    Lng,
}

impl FuelType {
    /// Correction applied to the reference CO2-equivalence factor, which is
    /// calibrated for diesel
    pub fn co2_factor(self) -> f64 {
        match self {
            Self::Diesel => 1.0,
            Self::Gas => 0.980428,
            Self::Cng | Self::Lng => 0.818456,
        }
    }
}

/// Topology, storage and fuel selection shared by every stage of a run.
/// Passed explicitly to each component that depends on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationContext {
    pub topology: TrainTopology,
    pub storage: EnergyStorageSystem,
    pub fuel_type: FuelType,
}

impl SimulationContext {
    /// Storage system in effect, `None` for non-hybrid topologies
    pub fn active_storage(&self) -> EnergyStorageSystem {
        if self.topology.is_hybrid() {
            self.storage
        } else {
            EnergyStorageSystem::None
        }
    }
}

/// User selection of topology, storage system and fuel.  Electric and
/// EngineElectric topologies never carry storage; EngineHybrid and FuelCell
/// always do.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    topology: TrainTopology,
    storage_system: EnergyStorageSystem,
    pub fuel_type: FuelType,
}

impl TrainOptions {
    pub fn new(topology: TrainTopology) -> Self {
        let mut opts = Self::default();
        opts.set_topology(topology);
        opts
    }

    pub fn topology(&self) -> TrainTopology {
        self.topology
    }

    pub fn storage_system(&self) -> EnergyStorageSystem {
        self.storage_system
    }

    /// Changes topology, forcing the storage system to agree with it
    pub fn set_topology(&mut self, topology: TrainTopology) {
        self.topology = topology;
        if !topology.is_hybrid() {
            self.storage_system = EnergyStorageSystem::None;
        } else if self.storage_system == EnergyStorageSystem::None {
            self.storage_system = EnergyStorageSystem::Battery;
        }
    }

    /// Changes the storage system, rejecting combinations the topology does
    /// not allow
    pub fn set_storage_system(&mut self, storage: EnergyStorageSystem) -> RemResult<()> {
        let allowed = self.topology.is_hybrid() != (storage == EnergyStorageSystem::None);
        if !allowed {
            return Err(RemError::InvalidConfiguration(format!(
                "storage system {storage:?} is not valid for topology {:?}",
                self.topology
            )));
        }
        self.storage_system = storage;
        Ok(())
    }

    pub fn context(&self) -> SimulationContext {
        SimulationContext {
            topology: self.topology,
            storage: self.storage_system,
            fuel_type: self.fuel_type,
        }
    }
}

impl SerdeAPI for TrainOptions {
    fn init(&mut self) -> RemResult<()> {
        let loaded = self.storage_system;
        self.set_topology(self.topology);
        if loaded != self.storage_system {
            log::warn!(
                "storage system {:?} replaced by {:?} to match topology {:?}",
                loaded,
                self.storage_system,
                self.topology
            );
        }
        Ok(())
    }
}
