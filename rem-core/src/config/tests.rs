use super::*;
use crate::imports::*;
use crate::params::ParameterOverride;
use crate::units::{Quantity, Unit};

fn hybrid(storage: EnergyStorageSystem) -> SimulationContext {
    SimulationContext {
        topology: TrainTopology::EngineHybrid,
        storage,
        fuel_type: FuelType::Diesel,
    }
}

fn value_of(params: &[ParameterOverride], name: &str) -> f64 {
    crate::params::find(params, name)
        .and_then(ParameterOverride::as_scalar)
        .unwrap_or_else(|| panic!("{name} missing"))
}

#[test]
fn test_topology_forces_storage() {
    let mut opts = TrainOptions::default();
    assert_eq!(opts.storage_system(), EnergyStorageSystem::None);

    opts.set_topology(TrainTopology::EngineHybrid);
    assert_eq!(opts.storage_system(), EnergyStorageSystem::Battery);

    opts.set_storage_system(EnergyStorageSystem::Flywheel).unwrap();
    opts.set_topology(TrainTopology::FuelCell);
    assert_eq!(opts.storage_system(), EnergyStorageSystem::Flywheel);

    opts.set_topology(TrainTopology::Electric);
    assert_eq!(opts.storage_system(), EnergyStorageSystem::None);
    assert!(matches!(
        opts.set_storage_system(EnergyStorageSystem::Battery),
        Err(RemError::InvalidConfiguration(_))
    ));

    let mut opts = TrainOptions::new(TrainTopology::FuelCell);
    assert!(opts.set_storage_system(EnergyStorageSystem::None).is_err());
    assert_eq!(opts.storage_system(), EnergyStorageSystem::Battery);
}

#[test]
fn test_train_options_normalized_on_load() {
    let opts = TrainOptions::from_yaml(
        "topology: Electric\nstorage_system: Battery\nfuel_type: CNG\n",
        false,
    )
    .unwrap();
    assert_eq!(opts.storage_system(), EnergyStorageSystem::None);
    assert_eq!(opts.fuel_type, FuelType::Cng);
}

#[test]
fn test_prime_power_selection() {
    let pt = PowertrainParameters::default();
    let ctx = |topology| SimulationContext {
        topology,
        ..Default::default()
    };
    assert_eq!(
        pt.canonical_prime_power(&ctx(TrainTopology::Electric)),
        pt.motor_power
    );
    assert_eq!(
        pt.canonical_prime_power(&ctx(TrainTopology::FuelCell)),
        pt.fuel_cell_power
    );
    assert_eq!(
        pt.canonical_prime_power(&ctx(TrainTopology::EngineHybrid)),
        pt.engine_power
    );
    assert_eq!(
        pt.canonical_prime_power(&ctx(TrainTopology::EngineElectric)),
        pt.engine_power
    );
}

#[test]
fn test_ess_power_selection() {
    let mut pt = PowertrainParameters::default();
    pt.flywheel_power = 700.0 * uc::KW;
    assert_eq!(
        pt.canonical_ess_power(&hybrid(EnergyStorageSystem::Flywheel)),
        700.0 * uc::KW
    );
    assert_eq!(
        pt.canonical_ess_power(&hybrid(EnergyStorageSystem::Battery)),
        pt.battery_power
    );
    let fuel_cell_none = SimulationContext {
        topology: TrainTopology::FuelCell,
        storage: EnergyStorageSystem::None,
        fuel_type: FuelType::Diesel,
    };
    assert_eq!(pt.canonical_ess_power(&fuel_cell_none), si::Power::ZERO);
    let electric = SimulationContext {
        topology: TrainTopology::Electric,
        storage: EnergyStorageSystem::Battery,
        fuel_type: FuelType::Diesel,
    };
    assert_eq!(pt.canonical_ess_power(&electric), si::Power::ZERO);
}

#[test]
fn test_powertrain_validates_active_components_only() {
    let mut pt = PowertrainParameters::default();
    pt.fuel_cell_power = 10.0 * uc::KW;
    pt.validate(&SimulationContext::default()).unwrap();
    let fuel_cell = SimulationContext {
        topology: TrainTopology::FuelCell,
        storage: EnergyStorageSystem::Battery,
        fuel_type: FuelType::Diesel,
    };
    assert!(pt.validate(&fuel_cell).is_err());

    let mut pt = PowertrainParameters::default();
    pt.engine_power = 200.0 * uc::KW;
    pt.validate(&SimulationContext::default()).unwrap();
    assert!(pt.validate(&hybrid(EnergyStorageSystem::Battery)).is_err());
}

#[test]
fn test_aess_requires_aux_engine() {
    let mut aux = AuxEngineOptions::default();
    assert!(!aux.aess());
    aux.set_aess(true);
    assert!(aux.aess());
    aux.kind = AuxEngineKind::None;
    assert!(!aux.aess());
    aux.kind = AuxEngineKind::Apu;
    assert!(aux.aess());
}

#[test]
fn test_presets() {
    let freight = VehicleParameters::from_preset(VehiclePreset::Freight);
    assert_eq!(freight.num_cars(), 50);
    assert!(almost_eq(
        freight.total_mass().get::<si::kilogram>(),
        190_000.0 + 50.0 * 115_000.0,
        None
    ));
    assert!(almost_eq(freight.gear_ratio(), 4.13, None));

    let default = VehicleParameters::default();
    assert_eq!(default, VehicleParameters::from_preset(VehiclePreset::Passenger));
    assert!(almost_eq(
        default.max_speed().get::<si::kilometer_per_hour>(),
        165.0,
        None
    ));
    for preset in [
        VehiclePreset::Freight,
        VehiclePreset::Passenger,
        VehiclePreset::Switch,
    ] {
        VehicleParameters::from_preset(preset).validate().unwrap();
    }
}

#[test]
fn test_vehicle_setters_convert_units() {
    let mut veh = VehicleParameters::default();
    veh.set_max_speed(Quantity::new(100.0, Unit::Mph)).unwrap();
    assert!(almost_eq(
        veh.max_speed().get::<si::meter_per_second>(),
        44.704,
        None
    ));
    veh.set_wheel_radius(Quantity::new(1.5, Unit::Ft)).unwrap();
    assert!(almost_eq(veh.wheel_radius().get::<si::meter>(), 0.4572, None));
    assert!(matches!(
        veh.set_car_mass(Quantity::new(1.0, Unit::Kw)),
        Err(RemError::InvalidUnit { .. })
    ));
    veh.set_gear_ratio(9.0);
    assert!(veh.validate().is_err());
}

#[test]
fn test_model_set() {
    let mut model = ParameterModel::default();
    model.set("vehicle.preset", "Freight").unwrap();
    assert_eq!(model.vehicle.num_cars(), 50);
    model.set("vehicle.num_cars", "20").unwrap();
    assert_eq!(model.vehicle.num_cars(), 20);
    assert!(model.set("vehicle.num_cars", "2.5").is_err());

    model.set("train.topology", "FuelCell").unwrap();
    model.set("train.storage_system", "Ultracapacitive").unwrap();
    assert_eq!(model.context().storage, EnergyStorageSystem::Ultracapacitive);
    model.set("train.fuel_type", "LNG").unwrap();
    assert_eq!(model.context().fuel_type, FuelType::Lng);

    model.set("powertrain.fuel_cell_power", "2 MW").unwrap_err();
    model.set("powertrain.fuel_cell_power", "2000 kW").unwrap();
    assert!(almost_eq(
        model.powertrain.fuel_cell_power.get::<si::kilowatt>(),
        2000.0,
        None
    ));
    model.set("powertrain.flywheel_energy", "40 MJ").unwrap();
    assert!(almost_eq(
        model.powertrain.flywheel_energy.get::<si::joule>(),
        40e6,
        None
    ));
    model.set("powertrain.motor_efficiency", "0.9").unwrap();
    model.set("powertrain.ultracap_capacitance", "120").unwrap();
    assert!(almost_eq(
        model.powertrain.ultracap_capacitance.get::<si::farad>(),
        120.0,
        None
    ));

    model.set("aux.kind", "APU").unwrap();
    model.set("aux.aess", "true").unwrap();
    assert!(model.aux_engine.aess());
    model.set("aux.load", "300 kW").unwrap();
    assert!(almost_eq(model.aux_engine.load.get::<si::kilowatt>(), 300.0, None));

    assert!(model.set("vehicle.colour", "red").is_err());
    assert!(model.set("powertrain.turbine_power", "1 kW").is_err());
    assert!(model.set("train.topology", "Steam").is_err());
    model.validate().unwrap();
}

#[test]
fn test_model_set_aess_and_rolling_resistance() {
    let mut model = ParameterModel::default();
    model.set("aux.kind", "APU").unwrap();
    model.set("aux.aess", "true").unwrap();
    assert!(model.aux_engine.aess());
    for value in ["yes", "1", "on", ""] {
        let err = model.set("aux.aess", value).unwrap_err();
        assert!(err.to_string().contains("aux.aess"), "{err}");
        assert!(model.aux_engine.aess(), "{value:?}");
    }
    model.set("aux.aess", "false").unwrap();
    assert!(!model.aux_engine.aess());

    let (_, speed_dependent) = model.vehicle.rolling_resistance();
    model.set("vehicle.rolling_resistance_1", "0.0015").unwrap();
    assert_eq!(model.vehicle.rolling_resistance(), (0.0015, speed_dependent));
    model.set("vehicle.rolling_resistance_2", "0.00003").unwrap();
    assert_eq!(model.vehicle.rolling_resistance(), (0.0015, 0.00003));
    assert!(model.set("vehicle.rolling_resistance_2", "low").is_err());
}

#[test]
fn test_input_parameters_order_and_values() {
    let mut model = ParameterModel::default();
    model.train_options.set_topology(TrainTopology::EngineHybrid);
    model
        .train_options
        .set_storage_system(EnergyStorageSystem::Flywheel)
        .unwrap();
    let params = model.input_parameters();
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "veh_init_mass",
            "veh_init_mass_cars",
            "veh_init_num_cars",
            "veh_init_frontal_area",
            "veh_init_coeff_drag",
            "wh_init_coeff_roll1",
            "wh_init_coeff_roll2",
            "wh_init_radius",
            "top_speed",
            "fd_init_ratio",
            "aux_eff",
            "AUXPOWER",
            "accelec_init_pwr",
            "accmech_init_pwr",
            "eng_eff",
            "gc_eff",
            "mc_eff",
            "PRIMEPOWER",
            "ess_energy",
            "ESSPOWER",
            "ess_capacitance",
            "fd_init_eff",
        ]
    );
    assert!(almost_eq(value_of(&params, "top_speed"), 165.0, None));
    assert!(almost_eq(value_of(&params, "AUXPOWER"), 240.0, None));
    assert!(almost_eq(value_of(&params, "accelec_init_pwr"), 1500.0, None));
    assert!(almost_eq(value_of(&params, "PRIMEPOWER"), 3000.0, None));
    assert!(almost_eq(value_of(&params, "ess_energy"), 37.0, None));
    assert!(almost_eq(value_of(&params, "ESSPOWER"), 1000.0, None));
    assert_eq!(value_of(&params, "ess_capacitance"), 0.0);

    let electric = ParameterModel {
        train_options: TrainOptions::new(TrainTopology::Electric),
        ..Default::default()
    };
    let params = electric.input_parameters();
    assert!(almost_eq(value_of(&params, "PRIMEPOWER"), 2000.0, None));
    assert_eq!(value_of(&params, "ESSPOWER"), 0.0);
    assert_eq!(value_of(&params, "ess_energy"), 0.0);
}

#[test]
fn test_model_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ParameterModel::default();
    model.set("train.topology", "EngineHybrid").unwrap();
    model.set("vehicle.max_speed", "90 mph").unwrap();
    for ext in ["yaml", "bin"] {
        let path = dir.path().join(format!("model.{ext}"));
        model.to_file(&path).unwrap();
        assert_eq!(ParameterModel::from_file(&path, false).unwrap(), model);
    }
    let path = dir.path().join("model.json");
    model.to_file(&path).unwrap();
    let loaded = ParameterModel::from_file(&path, false).unwrap();
    assert_eq!(loaded.context(), model.context());
    assert!(almost_eq(
        loaded.vehicle.max_speed().get::<si::mile_per_hour>(),
        90.0,
        None
    ));
}

#[test]
fn test_model_load_rejects_out_of_range() {
    let mut model = ParameterModel::default();
    model.aux_engine.efficiency = 0.9 * uc::R;
    let yaml = model.to_yaml().unwrap();
    assert!(ParameterModel::from_yaml(&yaml, false).is_err());
    assert!(ParameterModel::from_yaml(&yaml, true).is_ok());
}
