use clap::Parser;
use portfolio_annealer::market::{CsvDirSource, PriceSource};
use portfolio_annealer::report::RunReport;
use portfolio_annealer::sa::{Annealer, SaParams};
use portfolio_annealer::stats::ReturnStatistics;
use portfolio_annealer::RunConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Risk-capped portfolio allocation via simulated annealing"
)]
struct Args {
    /// Path to the TOML run configuration
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding one <ASSET>.csv price file per asset
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Where to write the run report
    #[arg(long, default_value = "results.txt")]
    out: PathBuf,
}

fn run(args: &Args) -> portfolio_annealer::Result<()> {
    let config = RunConfig::from_file(&args.config)?;
    info!(
        assets = config.assets.len(),
        start = %config.start,
        end = %config.end,
        max_risk = config.max_risk,
        "configuration loaded"
    );

    let prices = CsvDirSource::new(&args.data_dir).fetch(&config.assets, config.start, config.end)?;
    info!(observations = prices.len(), "price series aligned");

    let stats = ReturnStatistics::from_prices(&prices, config.max_risk)?;
    let outcome = Annealer::run(&stats, &SaParams::from(&config))?;
    info!(
        iterations = outcome.iterations,
        accepted = outcome.accepted_moves,
        improving = outcome.improving_moves,
        best_return = outcome.best.expected_return,
        best_volatility = outcome.best.volatility,
        best_fitness = -outcome.best.fitness,
        "search finished"
    );

    RunReport::new(&outcome, &stats).write_to(&args.out)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
