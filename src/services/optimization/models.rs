use crate::models::{Evaluation, Genotype, Outcome};
use serde::Serialize;
use uuid::Uuid;

/// Best-ever (genotype, fitness) pair of a run.
///
/// Starts as the "none found" sentinel and only moves on a strictly greater
/// fitness, so the tracked fitness never decreases.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Champion {
    pub(crate) genotype: Option<Genotype>,
    pub(crate) fitness: f64,
}

impl Champion {
    /// Returns true when the candidate became the new champion.
    pub(crate) fn observe(&mut self, genotype: Genotype, fitness: f64) -> bool {
        if fitness > self.fitness {
            self.genotype = Some(genotype);
            self.fitness = fitness;
            return true;
        }

        false
    }
}

/// Per-generation progress of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub population_size: usize,
    /// Highest fitness measured in this generation
    pub best_fitness: f64,
    /// Highest fitness measured so far in the run
    pub best_ever_fitness: f64,
    pub failed_evaluations: usize,
    pub timed_out_evaluations: usize,
}

impl GenerationSummary {
    pub(crate) fn new(
        generation: usize,
        evaluations: &[Evaluation],
        champion: &Champion,
    ) -> Self {
        let count = |outcome: Outcome| {
            evaluations
                .iter()
                .filter(|evaluation| evaluation.outcome == outcome)
                .count()
        };

        Self {
            generation,
            population_size: evaluations.len(),
            best_fitness: evaluations
                .iter()
                .map(Evaluation::fitness)
                .fold(0.0, f64::max),
            best_ever_fitness: champion.fitness,
            failed_evaluations: count(Outcome::Failed),
            timed_out_evaluations: count(Outcome::TimedOut),
        }
    }
}

/// Final result of a run.
///
/// `genotype` is `None` when no individual ever scored above 0.0.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub run_id: Uuid,
    pub seed: u64,
    pub genotype: Option<Genotype>,
    pub fitness: f64,
    pub generations: Vec<GenerationSummary>,
}
