use super::Genotype;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// How an evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The oracle reported a coverage value.
    Measured,
    /// The oracle failed for a reason other than a timeout.
    Failed,
    /// Every attempt ran out of time.
    TimedOut,
}

/// The result of evaluating one individual.
///
/// `fitness` is 0.0 whenever `outcome` is not [`Outcome::Measured`].
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub(crate) genotype: Genotype,
    pub(crate) fitness: f64,
    pub(crate) outcome: Outcome,
    pub(crate) attempts: u32,
    pub(crate) elapsed: Duration,
    pub(crate) evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub(crate) fn measured(
        genotype: Genotype,
        fitness: f64,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self::new(genotype, fitness, Outcome::Measured, attempts, elapsed)
    }

    pub(crate) fn failed(genotype: Genotype, attempts: u32, elapsed: Duration) -> Self {
        Self::new(genotype, 0.0, Outcome::Failed, attempts, elapsed)
    }

    pub(crate) fn timed_out(genotype: Genotype, attempts: u32, elapsed: Duration) -> Self {
        Self::new(genotype, 0.0, Outcome::TimedOut, attempts, elapsed)
    }

    fn new(
        genotype: Genotype,
        fitness: f64,
        outcome: Outcome,
        attempts: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            genotype,
            fitness,
            outcome,
            attempts,
            elapsed,
            evaluated_at: Utc::now(),
        }
    }

    /// The parameters used on the last attempt.
    pub fn genotype(&self) -> Genotype {
        self.genotype
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }
}
