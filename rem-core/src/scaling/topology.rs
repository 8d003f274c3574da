use super::{side_values, Scaler};
use crate::config::TrainTopology;
use crate::imports::*;
use crate::reference::{ConstName, ParamName};

impl<'a> Scaler<'a> {
    /// Power corrections for the selected prime mover
    pub(super) fn topology(&mut self) -> RemResult<()> {
        let prime_w = self.prime_kw() * 1000.0;
        let total_w = (self.prime_kw() + self.ess_kw()) * 1000.0;

        match self.ctx.topology {
            TrainTopology::EngineElectric => {
                self.engine()?;
                let power_corr = prime_w / self.divisor(ConstName::max_eng_power)?;
                log::debug!("{}", format_dbg!(power_corr));
                self.emit_side(side_values::POWER_CORR, vec![power_corr]);
                self.scale_curve(ParamName::mc_init_pwr_eff_prop_index, power_corr)?;
            }
            TrainTopology::Electric => {
                let power_corr = prime_w / self.divisor(ConstName::max_mc_pwr)?;
                log::debug!("{}", format_dbg!(power_corr));
                self.emit_side(side_values::POWER_CORR, vec![power_corr]);
                let elec_eff_map = prime_w / self.divisor(ConstName::max_mc_eff)?;
                self.emit_scalar(ParamName::max_mc_calc_pwr_elec_eff_map, elec_eff_map);
                self.scale_curve(ParamName::mc_init_pwr_eff_prop_index, power_corr)?;
            }
            TrainTopology::FuelCell => {
                let power_corr = prime_w / self.divisor(ConstName::max_fc_pwr)?;
                let power_corr2 = total_w / self.divisor(ConstName::max_mc_pwr)?;
                log::debug!("{}", format_dbg!((power_corr, power_corr2)));
                self.emit_side(side_values::POWER_CORR, vec![power_corr]);
                self.emit_side(side_values::POWER_CORR2, vec![power_corr2]);

                let model = self.model;
                let eff_ratio = model.powertrain.fuel_cell_efficiency.get::<si::ratio>()
                    / self.divisor(ConstName::mean_fc_eff)?;
                let h2_map = self
                    .curve(ParamName::fc_init_h2_hot_map)?
                    .scaled(power_corr)
                    .divided(eff_ratio, "fc_eff / mean_fc_eff")?;
                self.emit(ParamName::fc_init_h2_hot_map, h2_map);
                self.scale_curve(ParamName::fc_init_pwr_hot_index, power_corr)?;
                self.scale_curve(ParamName::fc_init_pwr_hot_max, power_corr)?;
                self.scale_curve(ParamName::mc_init_pwr_eff_prop_index, power_corr2)?;
                self.scale_curve(ParamName::mc_init_pwr_eff_reg_index, power_corr2)?;
            }
            TrainTopology::EngineHybrid => {
                self.engine()?;
                let power_corr = prime_w / self.divisor(ConstName::max_eng_power)?;
                let power_corr2 = total_w / self.divisor(ConstName::max_mc_pwr)?;
                log::debug!("{}", format_dbg!((power_corr, power_corr2)));
                self.emit_side(side_values::POWER_CORR, vec![power_corr]);
                self.emit_side(side_values::POWER_CORR2, vec![power_corr2]);
                self.scale_curve(ParamName::mc_init_pwr_eff_prop_index, power_corr2)?;

                let ess_w = self.ess_kw() * 1000.0;
                self.emit_scalar(
                    ParamName::ptc_prop_init_eng_pwr_wh_above_turn_on,
                    0.2 * ess_w,
                );
                self.emit_scalar(
                    ParamName::ptc_prop_init_eng_pwr_wh_below_turn_off,
                    0.1 * ess_w,
                );
            }
        }
        Ok(())
    }

    /// Emits reference curve `name` multiplied by `factor`
    fn scale_curve(&mut self, name: ParamName, factor: f64) -> RemResult<()> {
        let scaled = self.curve(name)?.scaled(factor);
        self.emit(name, scaled);
        Ok(())
    }
}
