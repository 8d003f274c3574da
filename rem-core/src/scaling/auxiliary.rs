use super::Scaler;
use crate::imports::*;
use crate::reference::ParamName;
use crate::utils::nonzero;

/// Auxiliary efficiency the reference APU fuel curve was derived at
const REFERENCE_AUX_EFFICIENCY: f64 = 0.5367;

impl<'a> Scaler<'a> {
    /// APU power index and fuel rate, sized to the configured auxiliary load
    pub(super) fn auxiliary(&mut self) -> RemResult<()> {
        let model = self.model;
        let aux = &model.aux_engine;
        let pwr_index = self.curve(ParamName::apu_pwr_index)?;
        let max_ref_apu_kw = nonzero(
            pwr_index.max_value(ParamName::apu_pwr_index.as_str())?,
            "max(apu_pwr_index)",
        )?;
        let load_ratio = aux.load.get::<si::kilowatt>() / max_ref_apu_kw;
        let eff_ratio = aux.efficiency.get::<si::ratio>() / REFERENCE_AUX_EFFICIENCY;
        log::debug!("{}", format_dbg!((load_ratio, eff_ratio)));

        let fuel_rate = self
            .curve(ParamName::apu_fuel_rate)?
            .scaled(load_ratio)
            .divided(eff_ratio, "aux_eff")?;
        self.emit(ParamName::apu_fuel_rate, fuel_rate);
        self.emit(ParamName::apu_pwr_index, pwr_index.scaled(load_ratio));
        Ok(())
    }
}
