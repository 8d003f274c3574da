//! Fixed vocabulary of reference-store keys.  Names match the identifiers used
//! in the simulator's parameter and constant files.

use crate::imports::*;

/// Declares a fieldless enum whose variant names double as store keys
macro_rules! name_enum {
    ($(#[$docs:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$docs])*
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

name_enum!(
    /// Scalar reference constants, precomputed from the reference curves of a
    /// simulator variant
    ConstName {
        max_apu_pwr_index,
        max_cap_capacitance,
        max_cap_res,
        max_dyn_brk_mc_spd,
        max_eng_power,
        max_eng_trq_fuel_index,
        max_fc_pwr,
        max_fly_energy,
        max_fly_pwr,
        max_mc_pwr,
        max_mc_spd_index,
        max_mc_trq_index,
        max_mc_eff,
        max_ptc_ess_pwr_map,
        max_ptc_wh_trq_index,
        mean_cap_voltage,
        mean_eng_eff,
        mean_fc_eff,
        mean_gc_eff,
        mean_mc_eff,
        min_eng_trq_fuel_index,
        min_mc_trq_index,
        veh_max_accel,
        ess_init_voltage,
        ess_init_cap_nom,
    }
);

name_enum!(
    /// Simulator parameters, both the reference curves read by the scaling
    /// engine and the scalars it emits
    ParamName {
        apu_fuel_rate,
        apu_pwr_index,
        drv_init_kp,
        dynamic_brake_brake_effort,
        dynamic_brake_mc_spd,
        dynamic_brake_trac_effort,
        eng_calc_pwr_eff_pwr_hot_index,
        eng_init_fuel_hot_map,
        eng_init_fuel_hot_map_cng,
        eng_init_fuel_hot_map_diesel,
        eng_init_fuel_hot_map_gasoline,
        eng_init_fuel_hot_map_lng,
        eng_init_trq_max_hot_map,
        ess_calc_pwr_chg,
        ess_calc_pwr_dis,
        ess_init_cap_map,
        ess_init_cap_map_max,
        ess_init_fly_max_pwr,
        ess_init_max_pwr,
        ess_init_num_cell_series,
        ess_init_num_module_parallel,
        ess_init_pwr_dmd_map,
        ess_init_pwr_dmd_wh_trq_index,
        fc_init_h2_hot_map,
        fc_init_pwr_hot_index,
        fc_init_pwr_hot_max,
        fuel_to_CO2eq_factor,
        gc_init_eff_inverse_trq_map,
        gc_init_eff_trq_map,
        gc_init_pwr_eff_prop_index,
        gc_init_trq_eff_index,
        gc_init_trq_prop_cont_map,
        gc_init_trq_reg_cont_map,
        max_mc_calc_pwr_elec_eff_map,
        max_motor_spd,
        mc_init_eff_inverse_trq_map,
        mc_init_eff_trq_map,
        mc_init_pwr_eff_prop_index,
        mc_init_pwr_eff_reg_index,
        mc_init_spd_eff_index,
        mc_init_spd_prop_cont_index,
        mc_init_trq_eff_index,
        mc_init_trq_prop_cont_map,
        mc_init_trq_reg_cont_map,
        ptc_prop_init_eng_pwr_wh_above_turn_on,
        ptc_prop_init_eng_pwr_wh_below_turn_off,
        wh_init_trq_brake_max,
    }
);
