//! Parent selection for the generational search.
//!
//! Parents are chosen by tournament: a handful of individuals are drawn at
//! random from the evaluated population and the fittest of them wins the
//! right to breed.
//!
//! # Tournament Selection
//!
//! Each tournament draws `tournament_size` *distinct* individuals, uniformly at
//! random and without replacement, then returns the one with the highest
//! fitness. When several drawn individuals share the highest fitness the one
//! drawn first wins, so ties are resolved by draw order rather than by a second
//! random choice.
//!
//! Tournament size guidelines:
//! - **Size 1**: no selection pressure, parents are uniformly random
//! - **Size 2-3**: balanced exploration and exploitation
//! - **Size equal to the population**: always picks the current best
//!
//! # Configuration Examples
//!
//! ```rust
//! use coverage_tuner::models::Selector;
//!
//! // The default used by the tuner
//! let selector = Selector::tournament(3)?;
//! assert_eq!(selector.tournament_size(), 3);
//!
//! // A tournament needs at least one contestant
//! assert!(Selector::tournament(0).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::models::Genotype;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Runs one tournament over `fitnesses` and returns the index of the winner.
fn tournament_selection(
    tournament_size: usize,
    fitnesses: &[f64],
    rng: &mut impl rand::Rng,
) -> usize {
    // Create indices and shuffle them; the first `tournament_size` are the contestants
    let mut indices: Vec<usize> = (0..fitnesses.len()).collect();
    indices.shuffle(rng);

    let mut winner = indices[0];
    for &idx in &indices[1..tournament_size] {
        if fitnesses[idx] > fitnesses[winner] {
            winner = idx;
        }
    }

    winner
}


/// Tournament selector configuration.
///
/// The tournament size must be at least 1 and must not exceed the size of the
/// population it is applied to. The lower limit is checked on construction;
/// the upper one when the optimization service is built and again on every
/// selection.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Number of individuals competing in each tournament
    pub(crate) tournament_size: usize,
}

/// Errors that can occur during parent selection.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum SelectionError {
    /// The population holds no individuals to select from.
    #[error("No valid parents available for selection")]
    NoValidParents,

    /// The tournament is larger than the population it draws from, or empty.
    ///
    /// Contestants are drawn without replacement, so a tournament can never
    /// hold more individuals than the population does.
    #[error(
        "Tournament size must be between 1 and the population size. tournament_size={tournament_size}, population_size={population_size}"
    )]
    InvalidTournamentSize {
        tournament_size: usize,
        population_size: usize,
    },

    /// Every individual needs exactly one fitness value.
    #[error("FitnessMismatch: expected {population_size}, got {fitness_count}")]
    FitnessMismatch {
        population_size: usize,
        fitness_count: usize,
    },
}

impl Selector {
    /// Creates a tournament selector with the given tournament size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coverage_tuner::models::Selector;
    ///
    /// let pressured = Selector::tournament(5)?;
    /// assert_eq!(pressured.tournament_size(), 5);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn tournament(tournament_size: usize) -> Result<Self, SelectionError> {
        if tournament_size == 0 {
            return Err(SelectionError::InvalidTournamentSize {
                tournament_size,
                population_size: 0,
            });
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Checks that a tournament fits into a population of the given size.
    pub(crate) fn validate(&self, population_size: usize) -> Result<(), SelectionError> {
        if self.tournament_size == 0 || self.tournament_size > population_size {
            return Err(SelectionError::InvalidTournamentSize {
                tournament_size: self.tournament_size,
                population_size,
            });
        }

        Ok(())
    }

    /// Selects one parent from `genotypes`, paired by index with `fitnesses`.
    #[instrument(level = "debug", skip(self, genotypes, fitnesses, rng), fields(tournament_size = self.tournament_size, num_candidates = genotypes.len()))]
    pub(crate) fn select<'a>(
        &self,
        genotypes: &'a [Genotype],
        fitnesses: &[f64],
        rng: &mut impl rand::Rng,
    ) -> Result<&'a Genotype, SelectionError> {
        if genotypes.is_empty() {
            return Err(SelectionError::NoValidParents);
        }

        if genotypes.len() != fitnesses.len() {
            return Err(SelectionError::FitnessMismatch {
                population_size: genotypes.len(),
                fitness_count: fitnesses.len(),
            });
        }

        self.validate(genotypes.len())?;

        let winner = tournament_selection(self.tournament_size, fitnesses, rng);

        Ok(&genotypes[winner])
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}
