use crate::models::{
    GeneBoundError, MutationRateOutOfRange, ProbabilityOutOfRangeError, SelectionError,
};
use crate::services::evaluation::InvalidMaxAttempts;

/// Errors that can occur while configuring or running an optimization.
///
/// Everything except `SelectionError` is a configuration error raised before the
/// first generation is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("InvalidPopulationSize: population size must be at least 1, got {0}")]
    InvalidPopulationSize(usize),
    #[error(
        "InvalidTournamentSize: tournament size must be between 1 and the population size. tournament_size={tournament_size}, population_size={population_size}"
    )]
    InvalidTournamentSize {
        tournament_size: usize,
        population_size: usize,
    },
    #[error("EvaluatorError: {0}")]
    InvalidMaxAttempts(#[from] InvalidMaxAttempts),
    #[error("CrossoverError: {0}")]
    CrossoverError(#[from] ProbabilityOutOfRangeError),
    #[error("MutationError: {0}")]
    MutationError(#[from] MutationRateOutOfRange),
    #[error("GeneBoundError: {0}")]
    GeneBoundError(#[from] GeneBoundError),
    #[error("Selection error: {0}")]
    SelectionError(#[from] SelectionError),
}
