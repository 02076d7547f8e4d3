mod crossover;
mod evaluator;
mod fitness;
mod gene_bounds;
mod genotype;
mod morphology;
mod mutagen;
mod population;
mod selector;
mod strategy;

pub use crossover::{Crossover, ProbabilityOutOfRangeError};
pub use evaluator::{Budget, FitnessOracle, OracleError, Probe, Step};
pub use fitness::{Evaluation, Outcome};
pub use gene_bounds::{GeneBoundError, GeneBounds};
pub use genotype::{GENOME_LENGTH, Gene, Genotype, MIN_GENE};
pub use morphology::Morphology;
pub use mutagen::{Mutagen, MutationRate, MutationRateOutOfRange};
pub use selector::{SelectionError, Selector};
pub use strategy::Strategy;

pub(crate) use population::Population;
