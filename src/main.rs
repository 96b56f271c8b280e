use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hdrhistogram::Histogram;
use sorx_rs::config::RouterConfig;
use sorx_rs::engine::evaluator::EvaluationMode;
use sorx_rs::engine::ranker::RankingStrategy;
use sorx_rs::engine::router::{RouteDecision, SmartOrderRouter};
use sorx_rs::engine::types::VenueSet;
use sorx_rs::market_data::sources::{FileSource, FixtureSource, SimulatedSource, VenueSource};
use sorx_rs::{input, report, telemetry};
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    Fixture,
    Simulated,
    File,
}

/// Score, rank and allocate an order across venues.
#[derive(Debug, Parser)]
#[command(name = "sorx", version)]
struct Cli {
    /// Stock symbol, prompted for when missing
    #[arg(long)]
    symbol: Option<String>,

    /// Shares to buy, prompted for when missing
    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i64>,

    /// Ranking strategy (overrides config)
    #[arg(long, value_enum)]
    strategy: Option<RankingStrategy>,

    /// Evaluation mode (overrides config)
    #[arg(long, value_enum)]
    evaluation: Option<EvaluationMode>,

    #[arg(long, value_enum, default_value = "fixture")]
    source: SourceKind,

    /// Snapshot file for `--source file` (.json or .csv)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Base price for `--source simulated`
    #[arg(long)]
    base_price: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Config file (toml/json/yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repeat the routing pass and report latency percentiles
    #[arg(long, default_value_t = 1)]
    iterations: u32,

    /// Print the decision as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[arg(long, default_value_t = 9000)]
    metrics_port: u16,
}

fn build_source(cli: &Cli) -> anyhow::Result<Box<dyn VenueSource>> {
    Ok(match cli.source {
        SourceKind::Fixture => Box::new(FixtureSource),
        SourceKind::Simulated => Box::new(SimulatedSource::new(cli.base_price, cli.seed)),
        SourceKind::File => {
            let path = cli.snapshot.clone().context("--source file requires --snapshot <path>")?;
            Box::new(FileSource::new(path))
        }
    })
}

fn run_passes(
    router: &SmartOrderRouter,
    venues: &VenueSet,
    quantity: i64,
    iterations: u32,
) -> anyhow::Result<(RouteDecision, Histogram<u64>)> {
    let mut histogram = Histogram::<u64>::new(3)?;
    let mut decision = router.route(venues.clone(), quantity)?;
    histogram.saturating_record(decision.elapsed.as_micros() as u64);

    for _ in 1..iterations {
        decision = router.route(venues.clone(), quantity)?;
        histogram.saturating_record(decision.elapsed.as_micros() as u64);
    }
    Ok((decision, histogram))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let mut config = RouterConfig::load(cli.config.as_deref())?;
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(evaluation) = cli.evaluation {
        config.evaluation = evaluation;
    }

    telemetry::init_tracing(&config.log_filter);
    telemetry::init_metrics(cli.metrics_port)?;

    let symbol = match &cli.symbol {
        Some(raw) => input::validate_symbol(raw)?,
        None => input::ask_symbol()?,
    };
    let quantity = match cli.quantity {
        Some(q) => q,
        None => input::ask_quantity()?,
    };
    if !cli.json {
        println!("\n✅ Input received: {} shares of {}\n", quantity, symbol);
    }

    let source = build_source(&cli)?;
    let venues = source.snapshot(&symbol).await?;
    info!(source = source.name(), venues = venues.len(), "Snapshot acquired");
    if !cli.json {
        println!("📊 Current Stock Data:");
        println!("{}", report::venue_table(&venues));
    }

    let router = SmartOrderRouter::from_config(&config)?;
    let iterations = cli.iterations.max(1);
    let (decision, histogram) =
        tokio::task::spawn_blocking(move || run_passes(&router, &venues, quantity, iterations)).await??;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print!("{}", report::decision_report(&decision));
        if iterations > 1 {
            println!("{}", report::latency_summary(&histogram));
        }
    }

    Ok(())
}
