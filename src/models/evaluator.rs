use super::Gene;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, time::Duration};

/// Wall-clock limits for the two steps of an oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Limit for the analysis tool run with the probed parameters
    pub primary: Duration,
    /// Limit for the coverage measurement that follows it
    pub measure: Duration,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            primary: Duration::from_secs(300),
            measure: Duration::from_secs(120),
        }
    }
}

/// One request to the fitness oracle.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    pub restarts: Gene,
    pub tries: Gene,
    pub target: &'a Path,
    pub budget: Budget,
}

/// The step of an oracle call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Analysis,
    Measurement,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Analysis => f.write_str("analysis"),
            Step::Measurement => f.write_str("measurement"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("NonZeroExit: {step} step exited with status {code:?}")]
    NonZeroExit { step: Step, code: Option<i32> },
    #[error("Timeout: {step} step exceeded {budget:?}")]
    Timeout { step: Step, budget: Duration },
    #[error("ParseFailure: {0}")]
    ParseFailure(String),
    #[error("IoError: {step} step could not be run: {source}")]
    Io {
        step: Step,
        #[source]
        source: std::io::Error,
    },
}

impl OracleError {
    /// Only timeouts are worth retrying, with smaller parameters.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OracleError::Timeout { .. })
    }
}

/// Black-box objective returning the coverage percentage reached with the probed parameters.
/// Successful values are expected to lie in `[0.0, 100.0]`.
pub trait FitnessOracle {
    fn coverage<'a>(&'a self, probe: Probe<'a>) -> BoxFuture<'a, Result<f64, OracleError>>;
}

impl<O: FitnessOracle + ?Sized> FitnessOracle for &O {
    fn coverage<'a>(&'a self, probe: Probe<'a>) -> BoxFuture<'a, Result<f64, OracleError>> {
        (**self).coverage(probe)
    }
}

impl<O: FitnessOracle + ?Sized> FitnessOracle for Box<O> {
    fn coverage<'a>(&'a self, probe: Probe<'a>) -> BoxFuture<'a, Result<f64, OracleError>> {
        (**self).coverage(probe)
    }
}
