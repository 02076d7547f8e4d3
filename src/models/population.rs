use super::{Genotype, Morphology};
use rand::Rng;
use tracing::instrument;

/// The genotypes of one generation, in evaluation order.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct Population {
    pub(crate) generation: usize,
    pub(crate) genotypes: Vec<Genotype>,
}

impl Population {
    pub(crate) fn new(generation: usize, genotypes: Vec<Genotype>) -> Self {
        Self {
            generation,
            genotypes,
        }
    }

    /// Creates the first generation from random genotypes.
    #[instrument(level = "debug", skip(morphology, rng), fields(population_size = size))]
    pub(crate) fn random(size: usize, morphology: &Morphology, rng: &mut impl Rng) -> Self {
        let genotypes = (0..size).map(|_| morphology.random(rng)).collect();

        Self::new(1, genotypes)
    }

    pub(crate) fn len(&self) -> usize {
        self.genotypes.len()
    }

    /// Swaps in the genotype that was actually evaluated for an individual.
    pub(crate) fn replace(&mut self, index: usize, genotype: Genotype) {
        self.genotypes[index] = genotype;
    }
}
