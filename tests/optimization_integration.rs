use coverage_tuner::models::{FitnessOracle, Genotype, OracleError, Probe, Selector, Step, Strategy};
use coverage_tuner::services::optimization::{Error, Service};
use futures::future::BoxFuture;
use std::sync::Mutex;

/// Stub oracle scoring `restarts + tries` (capped at 100) and recording every probe.
struct SumOracle {
    probes: Mutex<Vec<Genotype>>,
    fail: bool,
}

impl SumOracle {
    fn new() -> Self {
        Self {
            probes: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn probes(&self) -> Vec<Genotype> {
        self.probes.lock().unwrap().clone()
    }
}

impl FitnessOracle for SumOracle {
    fn coverage<'a>(&'a self, probe: Probe<'a>) -> BoxFuture<'a, Result<f64, OracleError>> {
        Box::pin(async move {
            self.probes
                .lock()
                .unwrap()
                .push(Genotype::new(probe.restarts, probe.tries));

            if self.fail {
                return Err(OracleError::NonZeroExit {
                    step: Step::Analysis,
                    code: Some(1),
                });
            }

            Ok(((probe.restarts + probe.tries) as f64).min(100.0))
        })
    }
}

fn service(
    oracle: &SumOracle,
    population_size: usize,
    max_generations: usize,
    tournament_size: usize,
    seed: u64,
) -> Service<&SumOracle> {
    Service::builder(oracle, "Problem03_label00.c")
        .with_strategy(Strategy::generational(max_generations, population_size))
        .with_selector(Selector::tournament(tournament_size).unwrap())
        .with_seed(seed)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_runs_are_reproducible_from_a_seed() -> anyhow::Result<()> {
    let lhs = SumOracle::new();
    let rhs = SumOracle::new();

    let lhs_solution = service(&lhs, 6, 4, 3, 1234).optimize().await?;
    let rhs_solution = service(&rhs, 6, 4, 3, 1234).optimize().await?;

    assert_eq!(lhs.probes(), rhs.probes());
    assert_eq!(lhs_solution.genotype, rhs_solution.genotype);
    assert_eq!(lhs_solution.generations, rhs_solution.generations);
    Ok(())
}

#[tokio::test]
async fn test_different_seeds_explore_differently() -> anyhow::Result<()> {
    let lhs = SumOracle::new();
    let rhs = SumOracle::new();

    service(&lhs, 6, 2, 3, 1).optimize().await?;
    service(&rhs, 6, 2, 3, 2).optimize().await?;

    assert_ne!(lhs.probes(), rhs.probes());
    Ok(())
}

#[tokio::test]
async fn test_best_ever_fitness_never_decreases() -> anyhow::Result<()> {
    let oracle = SumOracle::new();

    let solution = service(&oracle, 8, 6, 3, 99).optimize().await?;

    for pair in solution.generations.windows(2) {
        assert!(pair[1].best_ever_fitness >= pair[0].best_ever_fitness);
    }
    let last = solution.generations.last().unwrap();
    assert_eq!(solution.fitness, last.best_ever_fitness);
    Ok(())
}

#[tokio::test]
async fn test_odd_population_size_is_kept_every_generation() -> anyhow::Result<()> {
    let oracle = SumOracle::new();

    let solution = service(&oracle, 5, 4, 2, 5).optimize().await?;

    assert_eq!(oracle.probes().len(), 5 * 4);
    assert_eq!(solution.generations.len(), 4);
    for summary in &solution.generations {
        assert_eq!(summary.population_size, 5);
    }
    Ok(())
}

#[tokio::test]
async fn test_single_generation_keeps_the_best_initial_individual() -> anyhow::Result<()> {
    let oracle = SumOracle::new();

    let solution = service(&oracle, 4, 1, 2, 2024).optimize().await?;

    let probes = oracle.probes();
    assert_eq!(probes.len(), 4);
    let best = probes
        .iter()
        .map(|genotype| ((genotype.restarts() + genotype.tries()) as f64).min(100.0))
        .fold(0.0, f64::max);
    assert_eq!(solution.fitness, best);

    let genotype = solution.genotype.unwrap();
    assert!(probes.contains(&genotype));
    Ok(())
}

#[tokio::test]
async fn test_failing_oracle_leaves_the_sentinel() -> anyhow::Result<()> {
    let oracle = SumOracle::failing();

    let solution = service(&oracle, 4, 3, 2, 8).optimize().await?;

    assert_eq!(solution.genotype, None);
    assert_eq!(solution.fitness, 0.0);
    assert_eq!(solution.generations.len(), 3);
    for summary in &solution.generations {
        assert_eq!(summary.failed_evaluations, 4);
        assert_eq!(summary.best_ever_fitness, 0.0);
    }
    // Failures are not retried.
    assert_eq!(oracle.probes().len(), 4 * 3);
    Ok(())
}

#[tokio::test]
async fn test_tournament_larger_than_population_is_rejected() {
    let oracle = SumOracle::new();

    let result = Service::builder(&oracle, "Problem03_label00.c")
        .with_strategy(Strategy::generational(2, 2))
        .with_selector(Selector::tournament(3).unwrap())
        .build();

    assert!(matches!(
        result,
        Err(Error::InvalidTournamentSize {
            tournament_size: 3,
            population_size: 2
        })
    ));
    assert!(oracle.probes().is_empty());
}
