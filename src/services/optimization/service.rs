use super::models::{Champion, GenerationSummary, Solution};
use super::{Error, ServiceBuilder};
use crate::models::{
    Crossover, Evaluation, FitnessOracle, Genotype, Morphology, Mutagen, Outcome, Population,
    Selector, Strategy,
};
use crate::services::evaluation::Evaluator;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::path::PathBuf;
use tracing::instrument;
use uuid::Uuid;

// optimization service
pub struct Service<O> {
    pub(super) evaluator: Evaluator<O>,
    pub(super) strategy: Strategy,
    pub(super) selector: Selector,
    pub(super) crossover: Crossover,
    pub(super) mutagen: Mutagen,
    pub(super) morphology: Morphology,
    pub(super) seed: u64,
}

impl<O: FitnessOracle> Service<O> {
    pub fn builder(oracle: O, target: impl Into<PathBuf>) -> ServiceBuilder<O> {
        ServiceBuilder::new(oracle, target.into())
    }

    /// The seed every random decision of a run is derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn evaluator(&self) -> &Evaluator<O> {
        &self.evaluator
    }

    /// Runs the full generational search and returns the best-ever individual.
    ///
    /// Individuals are evaluated one at a time, in population order. Oracle
    /// failures are absorbed by the evaluator, so an error here means the
    /// breeding step could not select parents.
    #[instrument(level = "info", skip(self), fields(target = %self.evaluator.target().display(), seed = self.seed, strategy = ?self.strategy))]
    pub async fn optimize(&self) -> Result<Solution, Error> {
        let run_id = Uuid::now_v7();
        let mut rng = StdRng::seed_from_u64(self.seed);
        tracing::info!(%run_id, "Optimization started");

        let max_generations = self.strategy.max_generations();
        let mut population = Population::random(
            self.strategy.population_size(),
            &self.morphology,
            &mut rng,
        );
        let mut champion = Champion::default();
        let mut generations = Vec::with_capacity(max_generations);

        for generation in 1..=max_generations {
            tracing::info!(generation, "Evaluating generation");

            let evaluations = self
                .evaluate_population(&mut population, &mut champion)
                .await;

            let summary = GenerationSummary::new(generation, &evaluations, &champion);
            match champion.genotype {
                Some(best) => tracing::info!(
                    generation,
                    best_generation_fitness = summary.best_fitness,
                    "Best solution so far: {} with {}% coverage",
                    best,
                    champion.fitness
                ),
                None => tracing::info!(generation, "No individual has scored above 0% yet"),
            }
            generations.push(summary);

            // The last generation is only evaluated.
            if generation < max_generations {
                let fitnesses: Vec<f64> = evaluations.iter().map(Evaluation::fitness).collect();
                population = self.breed(&population, &fitnesses, &mut rng)?;
            }
        }

        tracing::info!(
            %run_id,
            fitness = champion.fitness,
            "Optimization completed"
        );

        Ok(Solution {
            run_id,
            seed: self.seed,
            genotype: champion.genotype,
            fitness: champion.fitness,
            generations,
        })
    }

    async fn evaluate_population(
        &self,
        population: &mut Population,
        champion: &mut Champion,
    ) -> Vec<Evaluation> {
        let mut evaluations = Vec::with_capacity(population.len());

        for index in 0..population.len() {
            let genotype = population.genotypes[index];
            let evaluation = self
                .evaluator
                .evaluate(&genotype, population.generation, index)
                .await;

            // A retry that succeeded with halved parameters replaces the individual.
            if evaluation.outcome() == Outcome::Measured {
                population.replace(index, evaluation.genotype());
            }

            if champion.observe(evaluation.genotype(), evaluation.fitness()) {
                tracing::debug!(
                    individual = index,
                    "New best individual {}",
                    evaluation.genotype()
                );
            }

            evaluations.push(evaluation);
        }

        evaluations
    }

    /// Produces the next generation from the evaluated one.
    #[instrument(level = "debug", skip(self, population, fitnesses, rng), fields(generation = population.generation))]
    fn breed<R: Rng>(
        &self,
        population: &Population,
        fitnesses: &[f64],
        rng: &mut R,
    ) -> Result<Population, Error> {
        let size = population.len();
        let mut offspring: Vec<Genotype> = Vec::with_capacity(size);

        while offspring.len() < size {
            let lhs = self.selector.select(&population.genotypes, fitnesses, rng)?;
            let rhs = self.selector.select(&population.genotypes, fitnesses, rng)?;

            let (mut a, mut b) = self.crossover.apply(rng, lhs, rhs);
            self.mutagen.mutate(rng, &mut a, &self.morphology);
            self.mutagen.mutate(rng, &mut b, &self.morphology);

            offspring.push(a);
            // Odd population sizes drop the surplus child.
            if offspring.len() < size {
                offspring.push(b);
            }
        }

        Ok(Population::new(population.generation + 1, offspring))
    }
}
