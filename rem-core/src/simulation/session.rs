use crate::imports::*;
use tempfile::TempDir;

/// Scratch directory holding the files exchanged with one simulator run.
/// The directory and everything in it is removed when the session is dropped,
/// unless [SimulationSession::keep] is called.
#[derive(Debug)]
pub struct SimulationSession {
    dir: TempDir,
}

impl SimulationSession {
    pub fn new() -> RemResult<Self> {
        let dir = tempfile::Builder::new().prefix("rem-sim-").tempdir()?;
        log::debug!("{}", format_dbg!(dir.path()));
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn inputs_path(&self) -> PathBuf {
        self.path().join("inputs.csv")
    }

    pub fn params_path(&self) -> PathBuf {
        self.path().join("params.csv")
    }

    pub fn outputs_path(&self) -> PathBuf {
        self.path().join("outputs.csv")
    }

    pub fn stdout_path(&self) -> PathBuf {
        self.path().join("stdout.log")
    }

    pub fn stderr_path(&self) -> PathBuf {
        self.path().join("stderr.log")
    }

    /// Persists the session files and returns their directory
    pub fn keep(self) -> PathBuf {
        self.dir.into_path()
    }
}
