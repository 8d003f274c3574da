use super::{side_values, Scaler};
use crate::config::FuelType;
use crate::imports::*;
use crate::reference::{ConstName, ParamName};

impl FuelType {
    /// Reference engine fuel map calibrated for this fuel
    pub fn fuel_hot_map(self) -> ParamName {
        match self {
            Self::Diesel => ParamName::eng_init_fuel_hot_map_diesel,
            Self::Gas => ParamName::eng_init_fuel_hot_map_gasoline,
            Self::Cng => ParamName::eng_init_fuel_hot_map_cng,
            Self::Lng => ParamName::eng_init_fuel_hot_map_lng,
        }
    }
}

impl<'a> Scaler<'a> {
    /// Engine and generator maps, shared by EngineElectric and EngineHybrid
    pub(super) fn engine(&mut self) -> RemResult<()> {
        let model = self.model;
        let pt = &model.powertrain;
        let power_corr = self.prime_kw() * 1000.0 / self.divisor(ConstName::max_eng_power)?;
        log::debug!("{}", format_dbg!(power_corr));
        self.emit_side(side_values::ENG_POWER_CORR, vec![power_corr]);

        let pwr_eff_hot_index = self
            .curve(ParamName::eng_calc_pwr_eff_pwr_hot_index)?
            .scaled(power_corr);
        self.emit(ParamName::eng_calc_pwr_eff_pwr_hot_index, pwr_eff_hot_index);

        let fuel_type = self.ctx.fuel_type;
        let fuel_map = self.curve(fuel_type.fuel_hot_map())?;
        let co2_factor = self
            .curve(ParamName::fuel_to_CO2eq_factor)?
            .scaled(fuel_type.co2_factor());
        self.emit(ParamName::fuel_to_CO2eq_factor, co2_factor);

        // fuel use falls as the configured mean efficiency rises
        let eff_ratio = pt.engine_efficiency.get::<si::ratio>()
            / self.divisor(ConstName::mean_eng_eff)?;
        let fuel_map = fuel_map
            .scaled(power_corr)
            .divided(eff_ratio, "eng_eff / mean_eng_eff")?;
        self.emit(ParamName::eng_init_fuel_hot_map, fuel_map);

        let trq_max = self
            .curve(ParamName::eng_init_trq_max_hot_map)?
            .scaled(power_corr);
        self.emit(ParamName::eng_init_trq_max_hot_map, trq_max);

        let gen_eff = pt.generator_efficiency.get::<si::ratio>();
        let mean_gc_eff = self.divisor(ConstName::mean_gc_eff)?;
        let eff_inverse = self
            .curve(ParamName::gc_init_eff_inverse_trq_map)?
            .scaled(mean_gc_eff)
            .divided(gen_eff, "gc_eff")?;
        self.emit(ParamName::gc_init_eff_inverse_trq_map, eff_inverse);
        let eff_trq = self
            .curve(ParamName::gc_init_eff_trq_map)?
            .scaled(gen_eff / mean_gc_eff);
        self.emit(ParamName::gc_init_eff_trq_map, eff_trq);

        for name in [
            ParamName::gc_init_pwr_eff_prop_index,
            ParamName::gc_init_trq_eff_index,
            ParamName::gc_init_trq_prop_cont_map,
            ParamName::gc_init_trq_reg_cont_map,
        ] {
            let scaled = self.curve(name)?.scaled(power_corr);
            self.emit(name, scaled);
        }
        Ok(())
    }
}
