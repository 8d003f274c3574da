use super::Scaler;
use crate::config::EnergyStorageSystem;
use crate::imports::*;
use crate::reference::{ConstName, ParamName};
use crate::utils::nonzero;

/// Trailing charge-power samples forced to zero
const CHARGE_TAPER_LEN: usize = 4;
/// Leading discharge-power samples forced to zero
const DISCHARGE_RAMP_LEN: usize = 3;

impl<'a> Scaler<'a> {
    /// Energy storage sizing for EngineHybrid and FuelCell topologies
    pub(super) fn hybrid(&mut self) -> RemResult<()> {
        let ess_w = self.ess_kw() * 1000.0;
        let pwr_dmd_map = self.curve(ParamName::ess_init_pwr_dmd_map)?.scaled(ess_w);
        self.emit(ParamName::ess_init_pwr_dmd_map, pwr_dmd_map);

        match self.ctx.active_storage() {
            EnergyStorageSystem::Battery => self.battery()?,
            EnergyStorageSystem::Flywheel => self.flywheel()?,
            EnergyStorageSystem::Ultracapacitive => self.ultracap()?,
            EnergyStorageSystem::None => {}
        }

        let max_mc_trq_index = self.constant(ConstName::max_mc_trq_index)?;
        let wh_trq_index = self
            .curve(ParamName::ess_init_pwr_dmd_wh_trq_index)?
            .scaled(max_mc_trq_index);
        self.emit(ParamName::ess_init_pwr_dmd_wh_trq_index, wh_trq_index);
        Ok(())
    }

    fn battery(&mut self) -> RemResult<()> {
        let model = self.model;
        let power_w = model.powertrain.battery_power.get::<si::watt>();

        let mut pwr_chg = constant_like(
            self.curve(ParamName::ess_calc_pwr_chg)?,
            -power_w,
            CHARGE_TAPER_LEN,
            ParamName::ess_calc_pwr_chg,
        )?;
        let n = pwr_chg.len();
        pwr_chg[n - CHARGE_TAPER_LEN..].fill(0.0);
        self.emit(ParamName::ess_calc_pwr_chg, pwr_chg);

        let mut pwr_dis = constant_like(
            self.curve(ParamName::ess_calc_pwr_dis)?,
            power_w,
            DISCHARGE_RAMP_LEN,
            ParamName::ess_calc_pwr_dis,
        )?;
        pwr_dis[..DISCHARGE_RAMP_LEN].fill(0.0);
        self.emit(ParamName::ess_calc_pwr_dis, pwr_dis);

        let energy_wh = model.powertrain.battery_energy.get::<si::watt_hour>();
        let num_module_parallel = energy_wh
            / self.divisor(ConstName::ess_init_voltage)?
            / self.divisor(ConstName::ess_init_cap_nom)?;
        self.emit_scalar(ParamName::ess_init_num_module_parallel, num_module_parallel);
        Ok(())
    }

    fn flywheel(&mut self) -> RemResult<()> {
        let model = self.model;
        let power_w = model.powertrain.flywheel_power.get::<si::watt>();
        self.emit_scalar(ParamName::ess_init_fly_max_pwr, power_w);

        let num_cell_series = power_w / self.divisor(ConstName::max_fly_pwr)?;
        self.emit_scalar(ParamName::ess_init_num_cell_series, num_cell_series);

        // reference kinetic energy is in J
        let energy_j = model.powertrain.flywheel_energy.get::<si::joule>();
        let num_module_parallel = energy_j / self.divisor(ConstName::max_fly_energy)?;
        self.emit_scalar(ParamName::ess_init_num_module_parallel, num_module_parallel);
        Ok(())
    }

    fn ultracap(&mut self) -> RemResult<()> {
        let model = self.model;
        let mean_cap_voltage = self.divisor(ConstName::mean_cap_voltage)?;
        let num_cell_series = self.constant(ConstName::ess_init_voltage)? / mean_cap_voltage;
        self.emit_scalar(ParamName::ess_init_num_cell_series, num_cell_series);

        let ref_max_pwr = self
            .curve(ParamName::ess_init_max_pwr)?
            .first()
            .copied()
            .ok_or_else(|| {
                RemError::InvalidReferenceData(format!("`{}` is empty", ParamName::ess_init_max_pwr))
            })?;
        let cell_pwr = mean_cap_voltage.powi(2) / (4.0 * self.divisor(ConstName::max_cap_res)?);
        let num_module_parallel = ref_max_pwr
            / nonzero(
                cell_pwr * num_cell_series,
                "ultracapacitor string power",
            )?;
        self.emit_scalar(ParamName::ess_init_num_module_parallel, num_module_parallel);

        let capacitance = num_cell_series
            / nonzero(num_module_parallel, ParamName::ess_init_num_module_parallel.as_str())?
            * model.powertrain.ultracap_capacitance.get::<si::farad>();
        let cap_map = vec![capacitance; self.curve(ParamName::ess_init_cap_map)?.len()];
        let cap_map_max = cap_map.max_value(ParamName::ess_init_cap_map.as_str())?;
        self.emit(ParamName::ess_init_cap_map, cap_map);
        self.emit_scalar(ParamName::ess_init_cap_map_max, cap_map_max);

        self.emit_scalar(
            ParamName::ess_init_max_pwr,
            model.powertrain.ultracap_power.get::<si::watt>(),
        );
        Ok(())
    }
}

/// Vector of `value` with the length of `reference`, which must be long
/// enough to hold `min_len` forced samples
fn constant_like(
    reference: &[f64],
    value: f64,
    min_len: usize,
    name: ParamName,
) -> RemResult<Vec<f64>> {
    if reference.len() < min_len {
        return Err(RemError::InvalidReferenceData(format!(
            "`{name}` has {} samples, at least {min_len} required",
            reference.len()
        )));
    }
    Ok(vec![value; reference.len()])
}
