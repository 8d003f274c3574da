//! Synthetic reference data for tests

use super::*;

pub(crate) const CURVE_LEN: usize = 8;

/// Curve `1, 2, ..., CURVE_LEN`
pub(crate) fn ramp() -> Vec<f64> {
    (1..=CURVE_LEN).map(|i| i as f64).collect()
}

pub(crate) fn mock_store(variant: SimulatorVariant) -> ReferenceStore {
    let mut store = ReferenceStore::new(variant);
    for &name in ConstName::ALL {
        store = store.with_constant(name, 1.0);
    }
    for &name in ParamName::ALL {
        store = store.with_curve(name, ramp());
    }
    store
        .with_curve(ParamName::dynamic_brake_brake_effort, ramp().scaled(2.0))
        .with_constant(ConstName::max_mc_spd_index, 250.0)
        .with_constant(ConstName::mean_mc_eff, 0.9)
        .with_constant(ConstName::max_mc_pwr, 2.0e6)
        .with_constant(ConstName::max_mc_eff, 0.95)
        .with_constant(ConstName::max_eng_power, 2.0e6)
        .with_constant(ConstName::mean_eng_eff, 0.4)
        .with_constant(ConstName::mean_gc_eff, 0.9)
        .with_constant(ConstName::max_fc_pwr, 1.5e6)
        .with_constant(ConstName::mean_fc_eff, 0.5)
        .with_constant(ConstName::max_fly_pwr, 5.0e5)
        .with_constant(ConstName::max_fly_energy, 1.0e7)
        .with_constant(ConstName::mean_cap_voltage, 2.5)
        .with_constant(ConstName::max_cap_res, 1.0e-3)
        .with_constant(ConstName::ess_init_voltage, 700.0)
        .with_constant(ConstName::ess_init_cap_nom, 50.0)
        .with_constant(ConstName::max_mc_trq_index, 1.5)
}

/// Library holding a [mock_store] for every variant
pub(crate) fn mock_library() -> ReferenceLibrary {
    let mut library = ReferenceLibrary::default();
    for variant in SimulatorVariant::ALL {
        library.insert(variant, mock_store(variant));
    }
    library
}
