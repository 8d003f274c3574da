use super::*;
use crate::config::{AuxEngineKind, AuxEngineOptions, SimulationContext, TrainTopology};

/// 101 samples at 1 s spacing, stationary except for t = 50 s
fn single_move_cycle() -> DriveCycle {
    let samples = (0..=100)
        .map(|t| {
            let v = if t == 50 { 3.0 } else { 0.0 };
            DriveCycleSample::new(t as f64, v, 0.0, true, 10.0)
        })
        .collect();
    DriveCycle::new("single_move", samples).unwrap()
}

fn aux(kind: AuxEngineKind, aess: bool) -> AuxEngineOptions {
    let mut aux = AuxEngineOptions::default();
    aux.kind = kind;
    aux.load = 300.0 * uc::KW;
    aux.set_aess(aess);
    aux
}

fn ctx(topology: TrainTopology) -> SimulationContext {
    SimulationContext {
        topology,
        ..Default::default()
    }
}

#[test]
fn test_aess_window() {
    let mut cycle = single_move_cycle();
    cycle.apply_aess(
        &aux(AuxEngineKind::Hep, true),
        &ctx(TrainTopology::EngineElectric),
    );
    for s in &cycle.samples {
        let t = s.time.get::<si::second>();
        if (30.0..=70.0).contains(&t) {
            assert!(s.key_on, "t = {t}");
            assert_eq!(s.aux_power_load, 300.0 * uc::KW);
        } else {
            // engine shut down, head end power still drawn
            assert!(!s.key_on, "t = {t}");
            assert_eq!(s.aux_power_load, 300.0 * uc::KW);
        }
    }
}

#[test]
fn test_aess_apu_keeps_load_while_off() {
    let mut cycle = single_move_cycle();
    cycle.apply_aess(
        &aux(AuxEngineKind::Apu, true),
        &ctx(TrainTopology::EngineHybrid),
    );
    assert!(!cycle.samples[0].key_on);
    assert_eq!(cycle.samples[0].aux_power_load, 300.0 * uc::KW);
    assert!(cycle.samples[50].key_on);
    assert_eq!(cycle.samples[50].aux_power_load, si::Power::ZERO);
}

#[test]
fn test_aess_disabled() {
    let mut hep = single_move_cycle();
    hep.apply_aess(
        &aux(AuxEngineKind::Hep, false),
        &ctx(TrainTopology::EngineElectric),
    );
    assert!(hep.samples.iter().all(|s| s.key_on));
    assert!(hep
        .samples
        .iter()
        .all(|s| s.aux_power_load == 300.0 * uc::KW));

    // AESS cannot be switched on without an auxiliary engine
    let mut none = single_move_cycle();
    let opts = aux(AuxEngineKind::None, true);
    assert!(!opts.aess());
    none.apply_aess(&opts, &ctx(TrainTopology::FuelCell));
    assert!(none.samples.iter().all(|s| s.key_on));
    assert!(none
        .samples
        .iter()
        .all(|s| s.aux_power_load == si::Power::ZERO));
}

#[test]
fn test_aess_skipped_for_electric() {
    let mut cycle = single_move_cycle();
    let original = cycle.clone();
    cycle.apply_aess(&aux(AuxEngineKind::Hep, true), &ctx(TrainTopology::Electric));
    assert_eq!(cycle, original);
}

#[test]
fn test_csv_skips_malformed_lines() {
    let csv = "\
0, 0, 0, 1, 10
1, 2, 0.01, 1, 10
bad, 2, 0, 1, 10
2, 4, 0.02, 0, 12
3, 4, 0.02
4, 6, -0.01, 1, 12
";
    let cycle = DriveCycle::from_csv_reader(csv.as_bytes(), "cycle").unwrap();
    assert_eq!(cycle.len(), 4);
    assert!(!cycle.samples[2].key_on);
    assert_eq!(cycle.samples[2].aux_power_load, 12.0 * uc::KW);
    let distance: Vec<f64> = cycle
        .samples
        .iter()
        .map(|s| s.distance.get::<si::meter>())
        .collect();
    // 2 m/s for 1 s, 4 m/s for 1 s, 6 m/s over the 2 s gap left by the bad line
    assert_eq!(distance, vec![0.0, 2.0, 6.0, 18.0]);
    assert_eq!(cycle.max_time(), 4.0 * uc::S);
}

#[test]
fn test_csv_skips_invalid_utf8() {
    let csv: &[u8] = b"0,0,0,1,10\n\xff\xfe,garbage\n1,2,0,1,10\n2,\xc3,0,1,10\n";
    let cycle = DriveCycle::from_csv_reader(csv, "bytes").unwrap();
    assert_eq!(cycle.len(), 2);
    assert_eq!(cycle.max_time(), 1.0 * uc::S);
    assert_eq!(cycle.samples[1].distance, 2.0 * uc::M);
}

#[test]
fn test_time_must_increase() {
    let csv = "0,0,0,1,0\n2,1,0,1,0\n2,1,0,1,0\n";
    assert!(matches!(
        DriveCycle::from_csv_reader(csv.as_bytes(), "repeat"),
        Err(RemError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        DriveCycle::from_csv_reader("junk\n".as_bytes(), "empty"),
        Err(RemError::InvalidConfiguration(_))
    ));
    assert!(DriveCycle::from_yaml("name: x\nsamples: []\n", false).is_err());
}

#[test]
fn test_insights() {
    let samples = vec![
        DriveCycleSample::new(0.0, 0.0, 0.0, true, 0.0),
        DriveCycleSample::new(10.0, 10.0, 0.01, true, 0.0),
        DriveCycleSample::new(20.0, 20.0, 0.03, true, 0.0),
        DriveCycleSample::new(30.0, 0.0, -0.02, true, 0.0),
    ];
    let insights = DriveCycle::new("x", samples).unwrap().insights();
    assert!(almost_eq(
        insights.top_speed.get::<si::kilometer_per_hour>(),
        72.0,
        None
    ));
    assert!(almost_eq(
        insights.average_speed.get::<si::kilometer_per_hour>(),
        27.0,
        None
    ));
    assert!(almost_eq(
        insights.average_moving_speed.get::<si::kilometer_per_hour>(),
        54.0,
        None
    ));
    assert!(almost_eq(insights.peak_grade.get::<si::ratio>(), 0.03, None));
    assert_eq!(insights.total_time, 30.0 * uc::S);

    assert_eq!(DriveCycle::default().insights(), DriveCycleInsights::default());
}

#[test]
fn test_csv_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round_trip.csv");
    let cycle = single_move_cycle();
    cycle.to_csv_file(&path).unwrap();
    let loaded = DriveCycle::from_path(&path).unwrap();
    assert_eq!(loaded.name, "round_trip");
    assert_eq!(loaded.samples, cycle.samples);

    let yaml_path = dir.path().join("cycle.yaml");
    cycle.to_file(&yaml_path).unwrap();
    assert_eq!(DriveCycle::from_path(&yaml_path).unwrap(), cycle);
}
