use crate::models::{Budget, Evaluation, FitnessOracle, Genotype, Probe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::instrument;

/// Default number of oracle calls made for one individual.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, thiserror::Error)]
#[error("InvalidMaxAttempts: at least one oracle attempt is required")]
pub struct InvalidMaxAttempts;

/// Scores individuals against a fitness oracle.
///
/// Oracle failures never escape: a failed or exhausted evaluation scores 0.0.
/// A timeout halves both parameters and tries again, up to `max_attempts`
/// oracle calls in total; any other failure ends the evaluation at once.
pub struct Evaluator<O> {
    oracle: O,
    target: PathBuf,
    budget: Budget,
    max_attempts: u32,
}

impl<O: FitnessOracle> Evaluator<O> {
    pub fn new(
        oracle: O,
        target: impl Into<PathBuf>,
        budget: Budget,
        max_attempts: u32,
    ) -> Result<Self, InvalidMaxAttempts> {
        if max_attempts == 0 {
            return Err(InvalidMaxAttempts);
        }

        Ok(Self {
            oracle,
            target: target.into(),
            budget,
            max_attempts,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[instrument(level = "debug", skip(self, genotype), fields(genotype = %genotype, target = %self.target.display()))]
    pub async fn evaluate(
        &self,
        genotype: &Genotype,
        generation: usize,
        individual: usize,
    ) -> Evaluation {
        let started = Instant::now();
        let mut attempted = *genotype;

        for attempt in 1..=self.max_attempts {
            let call_started = Instant::now();
            let probe = Probe {
                restarts: attempted.restarts(),
                tries: attempted.tries(),
                target: &self.target,
                budget: self.budget,
            };

            match self.oracle.coverage(probe).await {
                Ok(coverage) if (0.0..=100.0).contains(&coverage) => {
                    tracing::info!(
                        generation,
                        individual,
                        attempt,
                        "Parameters {} achieved {}% coverage in {:.2?}",
                        attempted,
                        coverage,
                        call_started.elapsed()
                    );
                    return Evaluation::measured(attempted, coverage, attempt, started.elapsed());
                }
                Ok(coverage) => {
                    tracing::warn!(
                        generation,
                        individual,
                        attempt,
                        "Parameters {} reported coverage {} outside 0-100, scoring 0",
                        attempted,
                        coverage
                    );
                    return Evaluation::failed(attempted, attempt, started.elapsed());
                }
                Err(err) if err.is_timeout() => {
                    if attempt == self.max_attempts {
                        tracing::warn!(
                            generation,
                            individual,
                            attempt,
                            err = %err,
                            "Parameters {} timed out, giving up after {} attempts",
                            attempted,
                            attempt
                        );
                        break;
                    }

                    let halved = attempted.halved();
                    tracing::warn!(
                        generation,
                        individual,
                        attempt,
                        err = %err,
                        "Parameters {} timed out, retrying with {}",
                        attempted,
                        halved
                    );
                    attempted = halved;
                }
                Err(err) => {
                    tracing::warn!(
                        generation,
                        individual,
                        attempt,
                        err = %err,
                        "Parameters {} failed after {:.2?}, scoring 0",
                        attempted,
                        call_started.elapsed()
                    );
                    return Evaluation::failed(attempted, attempt, started.elapsed());
                }
            }
        }

        Evaluation::timed_out(attempted, self.max_attempts, started.elapsed())
    }
}
