use super::{Gene, MIN_GENE};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum GeneBoundError {
    #[error("InvalidBounds: lower bound must not exceed upper. lower={lower}, upper={upper}")]
    InvalidBound { lower: Gene, upper: Gene },
    #[error("NonPositiveBound: genes must be at least {min}. lower={lower}")]
    NonPositive { lower: Gene, min: Gene },
    #[error("MalformedBounds: expected LOWER:UPPER, got {0:?}")]
    Malformed(String),
}

impl GeneBoundError {
    pub(crate) fn invalid_bound(lower: Gene, upper: Gene) -> Self {
        Self::InvalidBound { lower, upper }
    }

    pub(crate) fn non_positive(lower: Gene) -> Self {
        Self::NonPositive {
            lower,
            min: MIN_GENE,
        }
    }
}

/// Inclusive range of values a gene may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneBounds {
    pub(crate) lower: Gene,
    pub(crate) upper: Gene,
}

impl GeneBounds {
    #[instrument(level = "debug", fields(lower = lower, upper = upper))]
    pub fn new(lower: Gene, upper: Gene) -> Result<Self, GeneBoundError> {
        if lower < MIN_GENE {
            return Err(GeneBoundError::non_positive(lower));
        }

        if lower > upper {
            return Err(GeneBoundError::invalid_bound(lower, upper));
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Gene {
        self.lower
    }

    pub fn upper(&self) -> Gene {
        self.upper
    }

    pub fn contains(&self, gene: Gene) -> bool {
        (self.lower..=self.upper).contains(&gene)
    }

    /// Draws a value uniformly from the range.
    pub fn random(&self, rng: &mut impl Rng) -> Gene {
        rng.random_range(self.lower..=self.upper)
    }
}

impl Default for GeneBounds {
    fn default() -> Self {
        Self {
            lower: MIN_GENE,
            upper: 50,
        }
    }
}

impl FromStr for GeneBounds {
    type Err = GeneBoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lower, upper) = s
            .split_once(':')
            .ok_or_else(|| GeneBoundError::Malformed(s.to_string()))?;

        let parse = |value: &str| {
            value
                .trim()
                .parse::<Gene>()
                .map_err(|_| GeneBoundError::Malformed(s.to_string()))
        };

        Self::new(parse(lower)?, parse(upper)?)
    }
}

impl fmt::Display for GeneBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_rejects_inverted_bounds() {
        assert!(matches!(
            GeneBounds::new(10, 5),
            Err(GeneBoundError::InvalidBound { lower: 10, upper: 5 })
        ));
    }

    #[test]
    fn it_rejects_bounds_below_one() {
        assert!(matches!(
            GeneBounds::new(0, 5),
            Err(GeneBoundError::NonPositive { lower: 0, .. })
        ));
    }

    #[test]
    fn it_accepts_a_single_value_range() {
        let bounds = GeneBounds::new(7, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..10 {
            assert_eq!(bounds.random(&mut rng), 7);
        }
    }

    #[test]
    fn it_draws_within_bounds() {
        let bounds = GeneBounds::new(3, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            assert!(bounds.contains(bounds.random(&mut rng)));
        }
    }

    #[test]
    fn it_parses_lower_colon_upper() {
        let bounds: GeneBounds = "1:500".parse().unwrap();
        assert_eq!(bounds, GeneBounds::new(1, 500).unwrap());
        assert_eq!(bounds.to_string(), "1:500");
    }

    #[test]
    fn it_rejects_malformed_input() {
        assert!(matches!(
            "1-50".parse::<GeneBounds>(),
            Err(GeneBoundError::Malformed(_))
        ));
        assert!(matches!(
            "a:50".parse::<GeneBounds>(),
            Err(GeneBoundError::Malformed(_))
        ));
        assert!(matches!(
            "50:1".parse::<GeneBounds>(),
            Err(GeneBoundError::InvalidBound { .. })
        ));
    }
}
