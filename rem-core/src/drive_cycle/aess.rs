use super::DriveCycle;
use crate::config::{AuxEngineKind, AuxEngineOptions, SimulationContext, TrainTopology};
use crate::imports::*;

/// Half width, in seconds, of the look-around window used to decide whether
/// the train is about to move or has just stopped
pub const AESS_WINDOW_S: f64 = 20.0;

impl DriveCycle {
    /// Rewrites key-on state and auxiliary load for automatic engine
    /// start-stop.  Electric trains are left untouched.
    ///
    /// With AESS enabled, a sample whose `[t - 20 s, t + 20 s]` window holds any
    /// nonzero velocity keeps the engine on; otherwise the engine is shut down
    /// and only an independent auxiliary supply keeps feeding the load.
    pub fn apply_aess(&mut self, aux: &AuxEngineOptions, ctx: &SimulationContext) {
        if ctx.topology == TrainTopology::Electric {
            return;
        }
        let rated = aux.load;
        if !aux.aess() {
            let load = match aux.kind {
                AuxEngineKind::None | AuxEngineKind::Apu => si::Power::ZERO,
                AuxEngineKind::Hep => rated,
            };
            self.samples
                .iter_mut()
                .for_each(|s| s.aux_power_load = load);
            return;
        }

        // prefix[i] counts moving samples in samples[..i]
        let mut prefix = Vec::with_capacity(self.samples.len() + 1);
        prefix.push(0usize);
        for s in &self.samples {
            let moving = s.velocity != si::Velocity::ZERO;
            prefix.push(prefix[prefix.len() - 1] + moving as usize);
        }
        let times: Vec<si::Time> = self.samples.iter().map(|s| s.time).collect();
        let window = AESS_WINDOW_S * uc::S;

        let mut engine_on = 0usize;
        for (i, sample) in self.samples.iter_mut().enumerate() {
            let start = times.partition_point(|t| *t < times[i] - window);
            let end = times.partition_point(|t| *t <= times[i] + window);
            if prefix[end] > prefix[start] {
                sample.key_on = true;
                sample.aux_power_load = match aux.kind {
                    AuxEngineKind::Hep => rated,
                    _ => si::Power::ZERO,
                };
                engine_on += 1;
            } else {
                sample.key_on = false;
                sample.aux_power_load = match aux.kind {
                    AuxEngineKind::None => si::Power::ZERO,
                    _ => rated,
                };
            }
        }
        log::debug!(
            "{}",
            format_dbg!((engine_on, self.samples.len() - engine_on))
        );
    }
}
