use super::{side_values, Scaler};
use crate::imports::*;
use crate::reference::{ConstName, ParamName};
use crate::utils::nonzero;

impl<'a> Scaler<'a> {
    /// Motor speed, dynamic brake and motor torque curves, common to every
    /// topology.  The hybrid stage runs between the brake curves and the motor
    /// efficiency maps.
    pub(super) fn standard(&mut self) -> RemResult<()> {
        let model = self.model;
        let veh = &model.vehicle;
        let wheel_radius = veh.wheel_radius().get::<si::meter>();
        let gear_ratio = veh.gear_ratio();

        let max_motor_spd =
            veh.max_speed().get::<si::kilometer_per_hour>() / 3.6 / wheel_radius * gear_ratio;
        self.emit_scalar(ParamName::max_motor_spd, max_motor_spd);

        let spd_ratio = max_motor_spd / self.divisor(ConstName::max_mc_spd_index)?;
        let spd_eff_index = self.curve(ParamName::mc_init_spd_eff_index)?.scaled(spd_ratio);
        self.emit(ParamName::mc_init_spd_eff_index, spd_eff_index);
        let spd_prop_cont_index = self
            .curve(ParamName::mc_init_spd_prop_cont_index)?
            .scaled(spd_ratio);
        self.emit(
            ParamName::mc_init_spd_prop_cont_index,
            spd_prop_cont_index.clone(),
        );

        // effort curves are referred to the wheel
        let wheel_per_gear = wheel_radius / gear_ratio;
        let trac_effort = self
            .curve(ParamName::dynamic_brake_trac_effort)?
            .scaled(wheel_per_gear);
        self.emit(ParamName::dynamic_brake_trac_effort, trac_effort.clone());
        let brake_effort = self
            .curve(ParamName::dynamic_brake_brake_effort)?
            .scaled(wheel_per_gear);
        self.emit(ParamName::dynamic_brake_brake_effort, brake_effort.clone());

        let kp = 0.6 * veh.total_mass().get::<si::kilogram>();
        self.emit_scalar(ParamName::drv_init_kp, kp);

        let mc_spd = self
            .curve(ParamName::dynamic_brake_mc_spd)?
            .divided(wheel_per_gear, ParamName::dynamic_brake_mc_spd.as_str())?;
        let max_mc_spd = mc_spd.max_value(ParamName::dynamic_brake_mc_spd.as_str())?;
        let mc_spd = mc_spd
            .divided(max_mc_spd, ParamName::dynamic_brake_mc_spd.as_str())?
            .scaled(max_motor_spd);
        self.emit(ParamName::dynamic_brake_mc_spd, mc_spd);

        let reg_corr = brake_effort.ratio_to(
            &trac_effort,
            ParamName::dynamic_brake_brake_effort.as_str(),
            ParamName::dynamic_brake_trac_effort.as_str(),
        )?;
        self.emit_side(side_values::REG_CORR, reg_corr.clone());

        if self.ctx.topology.is_hybrid() {
            self.hybrid()?;
        }

        self.motor(&spd_prop_cont_index, &reg_corr)
    }

    /// Motor efficiency and torque maps
    fn motor(&mut self, spd_prop_cont_index: &[f64], reg_corr: &[f64]) -> RemResult<()> {
        let model = self.model;
        let pt = &model.powertrain;
        let motor_eff = pt.motor_efficiency.get::<si::ratio>();
        let mean_mc_eff = self.divisor(ConstName::mean_mc_eff)?;

        let eff_inverse = self
            .curve(ParamName::mc_init_eff_inverse_trq_map)?
            .scaled(mean_mc_eff)
            .divided(motor_eff, "mc_eff")?;
        self.emit(ParamName::mc_init_eff_inverse_trq_map, eff_inverse);
        let eff_trq = self
            .curve(ParamName::mc_init_eff_trq_map)?
            .scaled(motor_eff / mean_mc_eff);
        self.emit(ParamName::mc_init_eff_trq_map, eff_trq);

        let total_kw = self.prime_kw() + self.ess_kw();
        let trq_prop_cont_map = self.curve(ParamName::mc_init_trq_prop_cont_map)?;
        let temp_pwr = spd_prop_cont_index
            .times(
                trq_prop_cont_map,
                ParamName::mc_init_spd_prop_cont_index.as_str(),
                ParamName::mc_init_trq_prop_cont_map.as_str(),
            )?
            .max_value("mc_init_spd_prop_cont_index * mc_init_trq_prop_cont_map")?;
        let trq_scale = total_kw * 1000.0 / nonzero(temp_pwr, "peak continuous motor power")?;
        log::debug!("{}", format_dbg!(trq_scale));

        let trq_prop = trq_prop_cont_map.scaled(trq_scale);
        self.emit(ParamName::mc_init_trq_prop_cont_map, trq_prop.clone());
        let trq_eff_index = self
            .curve(ParamName::mc_init_trq_eff_index)?
            .scaled(trq_scale);
        self.emit(ParamName::mc_init_trq_eff_index, trq_eff_index);

        let trq_reg = trq_prop
            .times(
                reg_corr,
                ParamName::mc_init_trq_prop_cont_map.as_str(),
                side_values::REG_CORR,
            )?
            .scaled(-1.0);
        self.emit(ParamName::mc_init_trq_reg_cont_map, trq_reg);

        let trq_brake_max = trq_prop.max_value(ParamName::mc_init_trq_prop_cont_map.as_str())?
            * pt.final_drive_efficiency.get::<si::ratio>()
            * model.vehicle.gear_ratio();
        self.emit_scalar(ParamName::wh_init_trq_brake_max, trq_brake_max);

        let max_mc_pwr = self.constant(ConstName::max_mc_pwr)?;
        self.emit_side(side_values::MAX_MC_POWER, vec![max_mc_pwr]);
        Ok(())
    }
}
