use crate::models::{Budget, Crossover, GeneBounds, Morphology, Mutagen, Selector, Strategy};
use crate::oracle::{CommandOracle, DEFAULT_ANALYSIS_COMMAND, DEFAULT_MEASUREMENT_COMMAND};
use crate::services::optimization::{self, Service};
use crate::targets::{self, DEFAULT_EXTENSION};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("TargetError: {0}")]
    TargetError(#[from] targets::Error),
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] optimization::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tune")]
#[command(about = "Genetic search for the restarts and tries that maximise measured test coverage")]
pub struct Cli {
    /// Maximum level of emitted log events
    #[arg(long, global = true, env = "TUNER_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for the best parameters for one target
    Run(RunArgs),
    /// List the candidate targets
    Targets(TargetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Directory the analysis and measurement commands run in
    #[arg(long, env = "TUNER_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,
    /// Directory holding the targets, relative to the working directory
    #[arg(long, env = "TUNER_TARGETS_DIR", default_value = "SampleCode")]
    pub targets_dir: PathBuf,
    /// File extension of the targets
    #[arg(long, env = "TUNER_EXTENSION", default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

impl TargetArgs {
    pub fn dir(&self) -> PathBuf {
        self.workdir.join(&self.targets_dir)
    }

    pub fn list(&self) -> Result<Vec<PathBuf>, Error> {
        Ok(targets::list_targets(&self.dir(), &self.extension)?)
    }

    /// Resolves a selection to the path the commands should receive.
    ///
    /// Commands run inside the working directory, so targets below it are
    /// passed relative to it and every other target as an absolute path.
    pub fn resolve(&self, selection: &str) -> Result<PathBuf, Error> {
        let target = targets::resolve(selection, &self.dir(), &self.extension)?;
        let target = absolute(&target)?;
        let workdir = absolute(&self.workdir)?;

        Ok(match target.strip_prefix(&workdir) {
            Ok(relative) => Path::new(".").join(relative),
            Err(_) => target,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, targets::Error> {
    std::path::absolute(path).map_err(|source| targets::Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Target file name, stem, path or 1-based index into the target listing
    pub target: String,
    #[command(flatten)]
    pub targets: TargetArgs,
    /// Analysis command template
    #[arg(long, env = "TUNER_ANALYSIS_COMMAND", default_value = DEFAULT_ANALYSIS_COMMAND)]
    pub analysis_command: String,
    /// Coverage measurement command template
    #[arg(long, env = "TUNER_MEASUREMENT_COMMAND", default_value = DEFAULT_MEASUREMENT_COMMAND)]
    pub measurement_command: String,
    #[arg(long, env = "TUNER_POPULATION_SIZE", default_value_t = 10)]
    pub population_size: usize,
    #[arg(long, env = "TUNER_GENERATIONS", default_value_t = 10)]
    pub generations: usize,
    #[arg(long, env = "TUNER_TOURNAMENT_SIZE", default_value_t = 3)]
    pub tournament_size: usize,
    #[arg(long, env = "TUNER_CROSSOVER_RATE", default_value_t = 0.7)]
    pub crossover_rate: f64,
    #[arg(long, env = "TUNER_MUTATION_RATE", default_value_t = 0.2)]
    pub mutation_rate: f64,
    /// Range new individuals draw restarts from, as LOWER:UPPER
    #[arg(long, env = "TUNER_RESTARTS", default_value = "1:50")]
    pub restarts: GeneBounds,
    /// Range new individuals draw tries from, as LOWER:UPPER
    #[arg(long, env = "TUNER_TRIES", default_value = "1:50")]
    pub tries: GeneBounds,
    /// Range mutated restarts are drawn from, as LOWER:UPPER
    #[arg(long, env = "TUNER_RESTARTS_MUTATION", default_value = "1:50")]
    pub restarts_mutation: GeneBounds,
    /// Range mutated tries are drawn from, as LOWER:UPPER
    #[arg(long, env = "TUNER_TRIES_MUTATION", default_value = "1:50")]
    pub tries_mutation: GeneBounds,
    /// Seconds the analysis step may run
    #[arg(long, env = "TUNER_PRIMARY_TIMEOUT", default_value_t = 300)]
    pub primary_timeout: u64,
    /// Seconds the measurement step may run
    #[arg(long, env = "TUNER_MEASURE_TIMEOUT", default_value_t = 120)]
    pub measure_timeout: u64,
    /// Oracle calls per individual before it scores 0
    #[arg(long, env = "TUNER_MAX_ATTEMPTS", default_value_t = 5)]
    pub max_attempts: u32,
    /// Seed for a reproducible run
    #[arg(long, env = "TUNER_SEED")]
    pub seed: Option<u64>,
    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn oracle(&self) -> CommandOracle {
        CommandOracle::new(&self.targets.workdir)
            .with_analysis(&self.analysis_command)
            .with_measurement(&self.measurement_command)
    }

    pub fn budget(&self) -> Budget {
        Budget {
            primary: Duration::from_secs(self.primary_timeout),
            measure: Duration::from_secs(self.measure_timeout),
        }
    }

    pub fn morphology(&self) -> Morphology {
        Morphology::new(
            [self.restarts, self.tries],
            [self.restarts_mutation, self.tries_mutation],
        )
    }

    /// Resolves the target and builds the optimization service.
    pub fn service(&self) -> Result<Service<CommandOracle>, Error> {
        let target = self.targets.resolve(&self.target)?;

        let mut builder = Service::builder(self.oracle(), target)
            .with_strategy(Strategy::generational(
                self.generations,
                self.population_size,
            ))
            .with_selector(
                Selector::tournament(self.tournament_size).map_err(optimization::Error::from)?,
            )
            .with_crossover(
                Crossover::single_point(self.crossover_rate).map_err(optimization::Error::from)?,
            )
            .with_mutagen(Mutagen::constant(self.mutation_rate).map_err(optimization::Error::from)?)
            .with_morphology(self.morphology())
            .with_budget(self.budget())
            .with_max_attempts(self.max_attempts);

        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }

        Ok(builder.build()?)
    }
}
