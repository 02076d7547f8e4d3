use crate::models::{GENOME_LENGTH, GeneBounds, Genotype};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Per-gene value ranges.
///
/// New individuals are drawn from the creation ranges, mutated genes from the
/// mutation ranges. The two are configured separately and may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morphology {
    pub(crate) creation: [GeneBounds; GENOME_LENGTH],
    pub(crate) mutation: [GeneBounds; GENOME_LENGTH],
}

impl Morphology {
    pub fn new(
        creation: [GeneBounds; GENOME_LENGTH],
        mutation: [GeneBounds; GENOME_LENGTH],
    ) -> Self {
        Self { creation, mutation }
    }

    /// Uses the same creation and mutation range for every gene.
    pub fn uniform(creation: GeneBounds, mutation: GeneBounds) -> Self {
        Self {
            creation: [creation; GENOME_LENGTH],
            mutation: [mutation; GENOME_LENGTH],
        }
    }

    pub fn creation_bounds(&self) -> &[GeneBounds] {
        &self.creation
    }

    pub fn mutation_bounds(&self) -> &[GeneBounds] {
        &self.mutation
    }

    #[instrument(level = "debug", skip(self, rng))]
    pub(crate) fn random(&self, rng: &mut impl Rng) -> Genotype {
        Genotype {
            genome: self.creation.map(|bounds| bounds.random(rng)),
        }
    }
}

impl Default for Morphology {
    fn default() -> Self {
        Self::uniform(GeneBounds::default(), GeneBounds::default())
    }
}
