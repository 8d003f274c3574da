use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use eng_fmt::FormatEng;

use rem_core::prelude::*;
use rem_core::{params, results, scaling};

/// Scales locomotive powertrain parameters from reference data and runs the
/// external simulator on a drive cycle.
///
/// Logging verbosity follows `RUST_LOG`, e.g.
/// ```bash
/// RUST_LOG=debug rem scale -r reference/ --set train.topology=EngineHybrid --set train.storage_system=Battery
/// ```
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Unit system used for printed quantities: `metric` or `us`
    #[arg(short, long, global = true, default_value = "metric")]
    units: UnitSystem,
}

#[derive(Subcommand)]
enum Command {
    /// Write a configuration file (yaml or json) holding the default model
    Defaults {
        path: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Print statistics of a drive cycle
    Insights {
        /// Drive cycle file (csv, yaml or json)
        cycle: PathBuf,
    },
    /// Compute scaled parameter overrides for a configuration
    Scale {
        #[command(flatten)]
        model: ModelArgs,
        /// Directory holding `<VARIANT>_reference.yaml` files
        #[arg(short, long)]
        reference_dir: PathBuf,
        /// Write the override CSV here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the simulator and print a summary of the results
    Simulate {
        #[command(flatten)]
        model: ModelArgs,
        /// Directory holding `<VARIANT>_reference.yaml` files
        #[arg(short, long)]
        reference_dir: PathBuf,
        /// Directory holding the simulator executables
        #[arg(long)]
        model_dir: PathBuf,
        /// Drive cycle file (csv, yaml or json)
        #[arg(long)]
        cycle: PathBuf,
        /// Program used to start the simulator executable
        #[arg(long)]
        launcher: Option<PathBuf>,
        /// Keep the exchanged files after the run
        #[arg(long)]
        keep_files: bool,
        /// Write the per-step results CSV here
        #[arg(long)]
        results: Option<PathBuf>,
        /// Write the summary (yaml or json) here
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Configuration file (yaml or json); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override one setting, e.g. `--set "vehicle.max_speed=70 mph"`
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    settings: Vec<(String, String)>,
}

impl ModelArgs {
    fn load(&self) -> anyhow::Result<ParameterModel> {
        let mut model = match &self.config {
            Some(path) => ParameterModel::from_file(path, false)
                .with_context(|| format!("failed to load configuration {path:?}"))?,
            None => ParameterModel::default(),
        };
        for (key, value) in &self.settings {
            model
                .set(key, value)
                .with_context(|| format!("invalid setting `{key}={value}`"))?;
        }
        model.validate()?;
        Ok(model)
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Defaults { path, model } => {
            model.load()?.to_file(&path)?;
            println!("wrote {}", path.display());
        }
        Command::Insights { cycle } => {
            let cycle = DriveCycle::from_path(&cycle)?;
            print_insights(&cycle, cli.units);
        }
        Command::Scale {
            model,
            reference_dir,
            output,
        } => {
            let model = model.load()?;
            let variant = SimulatorVariant::from_context(&model.context())?;
            let store = ReferenceStore::from_dir(&reference_dir, variant)?;
            let overrides = scaling::scale_parameters(&model, &store)?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {path:?}"))?;
                    params::write_csv(&overrides, file)?;
                    log::info!("wrote {} overrides to {path:?}", overrides.len());
                }
                None => params::write_csv(&overrides, std::io::stdout().lock())?,
            }
        }
        Command::Simulate {
            model,
            reference_dir,
            model_dir,
            cycle,
            launcher,
            keep_files,
            results,
            summary,
        } => {
            let model = model.load()?;
            let library = ReferenceLibrary::load_dir(&reference_dir)?;
            let cycle = DriveCycle::from_path(&cycle)?;
            let mut simulator = ProcessSimulator::new(model_dir).with_keep_files(keep_files);
            if let Some(launcher) = launcher {
                simulator = simulator.with_launcher(launcher);
            }
            let outcome = run_simulation(
                &model,
                &library,
                &cycle,
                &simulator,
                &CancellationToken::new(),
            )?;
            if let Some(path) = results {
                write_results(&outcome.results, &path)?;
            }
            if let Some(path) = summary {
                outcome.summary.to_file(&path)?;
            }
            print_summary(&outcome.summary, cli.units);
        }
    }
    Ok(())
}

fn write_results(sim_results: &[SimResult], path: &Path) -> anyhow::Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("failed to create {path:?}"))?;
    results::write_results_csv(sim_results, file)?;
    Ok(())
}

fn print_insights(cycle: &DriveCycle, units: UnitSystem) {
    let insights = cycle.insights();
    let speed = |v: f64| units.display_si(QuantityKind::Speed, v);
    println!("cycle: {}", cycle.name);
    println!("top speed: {:.3}", speed(insights.top_speed.value));
    println!("average speed: {:.3}", speed(insights.average_speed.value));
    println!(
        "average moving speed: {:.3}",
        speed(insights.average_moving_speed.value)
    );
    println!("peak grade: {:.4} rad", insights.peak_grade.value);
    println!(
        "total time: {} s",
        insights.total_time.value.format_eng(Some(5))
    );
}

fn print_summary(summary: &SimulationSummary, units: UnitSystem) {
    use QuantityKind::*;
    let rows = [
        ("total fuel", Mass, summary.total_fuel.value),
        ("total distance", Distance, summary.total_distance.value),
        ("ESS energy", Energy, summary.total_ess_energy.value),
        ("APU fuel", Mass, summary.apu_fuel.value),
        ("APU fuel volume", Volume, summary.apu_fuel_volume.value),
        ("GHG emissions", Mass, summary.ghg_emissions.value),
        ("train mass", Mass, summary.train_mass.value),
        ("energy consumption", Energy, summary.energy_consumption.value),
        ("actual fuel volume", Volume, summary.actual_fuel_volume.value),
    ];
    for (label, kind, si_value) in rows {
        println!("{label}: {:.3}", units.display_si(kind, si_value));
    }
    println!("load per fuel mass: {:.3}", summary.load_per_fuel_mass);
    println!("MPGe: {:.3}", summary.mpge);
    println!("L/km equivalent: {:.5}", summary.lpkm_equivalent);
}
