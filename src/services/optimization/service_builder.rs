use crate::{
    models::{Budget, Crossover, FitnessOracle, Morphology, Mutagen, Selector, Strategy},
    services::{
        evaluation::{DEFAULT_MAX_ATTEMPTS, Evaluator},
        optimization::Service,
    },
};
use rand::Rng;
use std::path::PathBuf;
use tracing::instrument;

/// Collects the run configuration for a [`Service`].
///
/// Every setting has a default; `build` checks the combination and is the only
/// place configuration errors are raised.
pub struct ServiceBuilder<O> {
    pub(super) oracle: O,
    pub(super) target: PathBuf,
    pub(super) strategy: Strategy,
    pub(super) selector: Selector,
    pub(super) crossover: Crossover,
    pub(super) mutagen: Mutagen,
    pub(super) morphology: Morphology,
    pub(super) budget: Budget,
    pub(super) max_attempts: u32,
    pub(super) seed: Option<u64>,
}

impl<O: FitnessOracle> ServiceBuilder<O> {
    pub(super) fn new(oracle: O, target: PathBuf) -> Self {
        Self {
            oracle,
            target,
            strategy: Strategy::default(),
            selector: Selector::default(),
            crossover: Crossover::default(),
            mutagen: Mutagen::default(),
            morphology: Morphology::default(),
            budget: Budget::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutagen(mut self, mutagen: Mutagen) -> Self {
        self.mutagen = mutagen;
        self
    }

    pub fn with_morphology(mut self, morphology: Morphology) -> Self {
        self.morphology = morphology;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Fixes the random seed. Without one a seed is drawn at build time and logged.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[instrument(level = "debug", skip(self), fields(strategy = ?self.strategy, tournament_size = self.selector.tournament_size, max_attempts = self.max_attempts))]
    pub fn build(self) -> Result<Service<O>, super::Error> {
        let population_size = self.strategy.population_size();
        if population_size == 0 {
            return Err(super::Error::InvalidPopulationSize(population_size));
        }

        if self.selector.validate(population_size).is_err() {
            return Err(super::Error::InvalidTournamentSize {
                tournament_size: self.selector.tournament_size,
                population_size,
            });
        }

        let evaluator =
            Evaluator::new(self.oracle, self.target, self.budget, self.max_attempts)?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());

        Ok(Service {
            evaluator,
            strategy: self.strategy,
            selector: self.selector,
            crossover: self.crossover,
            mutagen: self.mutagen,
            morphology: self.morphology,
            seed,
        })
    }
}
