use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Strategy {
    Generational {
        /// number of evaluate-select-vary cycles
        max_generations: usize,
        /// number of genotypes evaluated per generation
        population_size: usize,
    },
}

impl Strategy {
    pub fn generational(max_generations: usize, population_size: usize) -> Self {
        Self::Generational {
            max_generations,
            population_size,
        }
    }

    pub fn max_generations(&self) -> usize {
        match self {
            Strategy::Generational {
                max_generations, ..
            } => *max_generations,
        }
    }

    pub fn population_size(&self) -> usize {
        match self {
            Strategy::Generational {
                population_size, ..
            } => *population_size,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::generational(10, 10)
    }
}
