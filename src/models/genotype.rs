use serde::{Deserialize, Serialize};
use std::fmt;

pub type Gene = i64;

/// Number of genes in every genotype: `restarts` followed by `tries`.
pub const GENOME_LENGTH: usize = 2;

/// Smallest value any gene may take.
pub const MIN_GENE: Gene = 1;

/// A candidate `(restarts, tries)` parameter pair.
///
/// Both genes are kept at or above [`MIN_GENE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGenotype")]
pub struct Genotype {
    pub(crate) genome: [Gene; GENOME_LENGTH],
}

/// Unchecked wire form; every gene must be at least [`MIN_GENE`].
#[derive(Deserialize)]
struct RawGenotype {
    genome: [Gene; GENOME_LENGTH],
}

impl TryFrom<RawGenotype> for Genotype {
    type Error = String;

    fn try_from(raw: RawGenotype) -> Result<Self, Self::Error> {
        if raw.genome.iter().any(|&gene| gene < MIN_GENE) {
            return Err(format!(
                "genes must be at least {MIN_GENE}, got {:?}",
                raw.genome
            ));
        }

        Ok(Self { genome: raw.genome })
    }
}

impl Genotype {
    /// Creates a genotype. Values below [`MIN_GENE`] are raised to it.
    pub fn new(restarts: Gene, tries: Gene) -> Self {
        Self {
            genome: [restarts.max(MIN_GENE), tries.max(MIN_GENE)],
        }
    }

    pub fn restarts(&self) -> Gene {
        self.genome[0]
    }

    pub fn tries(&self) -> Gene {
        self.genome[1]
    }

    pub fn genome(&self) -> &[Gene] {
        &self.genome
    }

    /// Halves every gene, flooring at [`MIN_GENE`].
    pub(crate) fn halved(&self) -> Self {
        Self {
            genome: self.genome.map(|gene| (gene / 2).max(MIN_GENE)),
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.restarts(), self.tries())
    }
}
