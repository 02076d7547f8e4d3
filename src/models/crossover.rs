use crate::models::{GENOME_LENGTH, Genotype};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Takes genes before `point` from `lhs` and the rest from `rhs`.
fn crossover_single_point(lhs: &Genotype, rhs: &Genotype, point: usize) -> Genotype {
    let mut genome = lhs.genome;
    genome[point..].copy_from_slice(&rhs.genome[point..]);

    Genotype { genome }
}

/// Gated single-point crossover.
///
/// With probability `rate` the two parents are cut at a random internal
/// position and their tails swapped, producing two children. Otherwise the
/// children are plain copies of the parents.
///
/// For the two-gene `(restarts, tries)` genome the only internal position is
/// between the genes, so a recombination always swaps `tries`:
///
/// ```rust
/// use coverage_tuner::models::Crossover;
///
/// // Recombine every pair
/// let always = Crossover::single_point(1.0)?;
///
/// // Never recombine; children are clones of their parents
/// let never = Crossover::single_point(0.0)?;
///
/// assert!(Crossover::single_point(1.5).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossover {
    pub(crate) rate: f64,
}

/// Error returned when a crossover rate lies outside `[0.0, 1.0]`.
#[derive(Debug, thiserror::Error)]
#[error("crossover rate must be between 0.0 and 1.0, got {0}")]
pub struct ProbabilityOutOfRangeError(f64);

impl Crossover {
    pub fn single_point(rate: f64) -> Result<Self, ProbabilityOutOfRangeError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ProbabilityOutOfRangeError(rate));
        }

        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Produces two children from two parents.
    #[instrument(level = "debug", skip(self, rng), fields(rate = self.rate, lhs = %lhs, rhs = %rhs))]
    pub(crate) fn apply<R: Rng>(
        &self,
        rng: &mut R,
        lhs: &Genotype,
        rhs: &Genotype,
    ) -> (Genotype, Genotype) {
        if !rng.random_bool(self.rate) {
            return (*lhs, *rhs);
        }

        let point = rng.random_range(1..GENOME_LENGTH); // Cut point
        (
            crossover_single_point(lhs, rhs, point),
            crossover_single_point(rhs, lhs, point),
        )
    }
}

impl Default for Crossover {
    fn default() -> Self {
        Self { rate: 0.7 }
    }
}
