use thiserror::Error;

/// Faults raised while configuring, scaling or simulating.  Every variant is
/// terminal for the computation that raised it.
#[derive(Debug, Error)]
pub enum RemError {
    #[error("invalid unit `{unit}` for {kind}")]
    InvalidUnit { unit: String, kind: String },
    #[error("missing reference data: `{0}`")]
    MissingReferenceData(String),
    #[error("invalid reference data: {0}")]
    InvalidReferenceData(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("simulation failed: {0}")]
    Simulation(String),
    #[error("simulation cancelled")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type RemResult<T> = Result<T, RemError>;
