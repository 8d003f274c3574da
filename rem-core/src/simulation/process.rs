use super::{CancellationToken, SimulationSession, Simulator, SimulatorInputs, SimulatorOutputs};
use crate::imports::*;
use crate::params::{self, ParameterOverride};
use crate::reference::SimulatorVariant;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// File name suffix of the simulator executables on this platform
pub const EXE_SUFFIX: &str = std::env::consts::EXE_SUFFIX;

/// Runs the pre-built simulator executables found in `model_dir`, one per
/// [SimulatorVariant], as child processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSimulator {
    pub model_dir: PathBuf,
    /// program the executable is handed to instead of being run directly,
    /// e.g. an interpreter for script stand-ins
    #[serde(default)]
    pub launcher: Option<PathBuf>,
    /// how often the child is checked for completion or cancellation
    #[serde(default = "ProcessSimulator::default_poll_interval")]
    pub poll_interval: Duration,
    /// keep the exchanged files instead of deleting them after the run
    #[serde(default)]
    pub keep_files: bool,
}

impl SerdeAPI for ProcessSimulator {}

impl ProcessSimulator {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            launcher: None,
            poll_interval: Self::default_poll_interval(),
            keep_files: false,
        }
    }

    fn default_poll_interval() -> Duration {
        Duration::from_millis(50)
    }

    pub fn with_launcher<P: Into<PathBuf>>(mut self, launcher: P) -> Self {
        self.launcher = Some(launcher.into());
        self
    }

    pub fn with_keep_files(mut self, keep_files: bool) -> Self {
        self.keep_files = keep_files;
        self
    }

    /// Path of the executable for `variant`
    pub fn executable(&self, variant: SimulatorVariant) -> PathBuf {
        self.model_dir
            .join(format!("{}{}", variant.as_str(), EXE_SUFFIX))
    }

    /// Runs `variant` with all exchanged files placed in `session`
    pub fn run_in(
        &self,
        session: &SimulationSession,
        variant: SimulatorVariant,
        inputs: &SimulatorInputs,
        params: &[ParameterOverride],
        cancel: &CancellationToken,
    ) -> RemResult<SimulatorOutputs> {
        let exe = self.executable(variant);
        if !exe.is_file() {
            return Err(RemError::Simulation(format!(
                "simulator executable {exe:?} not found"
            )));
        }
        inputs.write_csv(File::create(session.inputs_path())?)?;
        params::write_csv(params, File::create(session.params_path())?)?;

        let mut cmd = match &self.launcher {
            Some(launcher) => {
                let mut cmd = Command::new(launcher);
                cmd.arg(&exe);
                cmd
            }
            None => Command::new(&exe),
        };
        cmd.arg("-tf")
            .arg(inputs.max_time().to_string())
            .arg("-i")
            .arg(session.inputs_path())
            .arg("-o")
            .arg(session.outputs_path())
            .arg("-p")
            .arg(session.params_path())
            .current_dir(&self.model_dir)
            .stdin(Stdio::null())
            .stdout(File::create(session.stdout_path())?)
            .stderr(File::create(session.stderr_path())?);

        log::info!(
            "starting {variant} simulator over {} time steps",
            inputs.len()
        );
        let mut child = cmd
            .spawn()
            .map_err(|err| RemError::Simulation(format!("could not start {exe:?}: {err}")))?;

        let status = loop {
            if cancel.is_cancelled() {
                log::info!("cancelling {variant} simulator");
                // the child may already have exited on its own
                if let Err(err) = child.kill() {
                    log::debug!("{}", format_dbg!(err));
                }
                child.wait()?;
                return Err(RemError::Cancelled);
            }
            match child.try_wait()? {
                Some(status) => break status,
                None => thread::sleep(self.poll_interval),
            }
        };

        let stderr = std::fs::read_to_string(session.stderr_path()).unwrap_or_default();
        if !status.success() {
            return Err(RemError::Simulation(format!(
                "{exe:?} exited with {status}\nSTDERR:\n{stderr}"
            )));
        }
        let outputs = File::open(session.outputs_path()).map_err(|err| {
            RemError::Simulation(format!(
                "unable to open simulation output {:?}: {err}\nSTDERR:\n{stderr}",
                session.outputs_path()
            ))
        })?;
        let outputs = SimulatorOutputs::read_csv(outputs)?;
        log::info!(
            "{variant} simulator finished with {} outputs",
            outputs.columns.len()
        );
        Ok(outputs)
    }
}

impl Simulator for ProcessSimulator {
    fn simulate(
        &self,
        variant: SimulatorVariant,
        inputs: &SimulatorInputs,
        params: &[ParameterOverride],
        cancel: &CancellationToken,
    ) -> RemResult<SimulatorOutputs> {
        let session = SimulationSession::new()?;
        let outputs = self.run_in(&session, variant, inputs, params, cancel);
        if self.keep_files {
            log::info!("kept simulation files in {:?}", session.keep());
        }
        outputs
    }
}
