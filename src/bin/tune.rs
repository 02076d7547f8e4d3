use clap::Parser;
use coverage_tuner::config::{Cli, Command, RunArgs, TargetArgs};

// Searches for the restarts and tries that maximise the coverage measured for one target.
// Configuration comes from flags, TUNER_* variables or a local .env.local file.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::from_filename(".env.local").ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(cli.log_level)
        .init();

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Targets(args) => list(args),
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let service = args.service()?;
    tracing::info!(
        seed = service.seed(),
        target = %service.evaluator().target().display(),
        "Starting parameter search"
    );

    let solution = service.optimize().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }

    match solution.genotype {
        Some(genotype) => println!(
            "Best parameters: restarts={} tries={} coverage={}% (seed {})",
            genotype.restarts(),
            genotype.tries(),
            solution.fitness,
            solution.seed
        ),
        None => println!(
            "No parameters achieved coverage above 0% (seed {})",
            solution.seed
        ),
    }

    Ok(())
}

fn list(args: TargetArgs) -> anyhow::Result<()> {
    for (index, target) in args.list()?.iter().enumerate() {
        println!("{:>3}. {}", index + 1, target.display());
    }

    Ok(())
}
