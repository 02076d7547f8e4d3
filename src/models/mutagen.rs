use crate::models::{Genotype, Morphology};
use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================
// MutationRate
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationRate {
    value: f64,
}

#[derive(Debug, thiserror::Error)]
#[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self { value })
    }

    pub fn get(&self) -> f64 {
        self.value
    }
}

// ============================================================
// Mutagen
// ============================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutagen {
    mutation_rate: MutationRate,
}

impl Mutagen {
    pub fn new(mutation_rate: MutationRate) -> Self {
        Self { mutation_rate }
    }

    pub fn constant(mutation_rate_value: f64) -> Result<Self, MutationRateOutOfRange> {
        Ok(Self::new(MutationRate::new(mutation_rate_value)?))
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate.get()
    }

    /// Redraws each gene from its mutation range with probability `mutation_rate`.
    pub(crate) fn mutate<R: Rng>(
        &self,
        rng: &mut R,
        genotype: &mut Genotype,
        morphology: &Morphology,
    ) {
        let mutation_rate = self.mutation_rate.get();

        for (gene, bounds) in genotype
            .genome
            .iter_mut()
            .zip(morphology.mutation_bounds().iter())
        {
            // Should we mutate this gene?
            if rng.random_range(0.0..1.0) < mutation_rate {
                *gene = bounds.random(rng);
            }
        }
    }
}

impl Default for Mutagen {
    fn default() -> Self {
        Self {
            mutation_rate: MutationRate { value: 0.2 },
        }
    }
}
