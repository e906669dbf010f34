//! FII market simulation - main binary.
//!
//! Loads the parameter bundle, runs the day loop, and prints a final
//! summary. Per-day result lines and per-agent warnings go through
//! `tracing`; set `RUST_LOG=warn` to quiet the day lines.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use simulation::{Market, SimulationParams, SimulationResult};

/// Agent-based simulation of a real-estate-fund secondary market.
#[derive(Parser, Debug)]
#[command(name = "fii-market-sim")]
#[command(about = "Agent-based FII secondary market simulation")]
#[command(version)]
struct Args {
    /// Path to the JSON parameter bundle (defaults apply when omitted).
    #[arg(long, env = "SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of trading days.
    #[arg(long, env = "SIM_DAYS")]
    days: Option<u64>,

    /// Override the random seed.
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,

    /// Override the worker-pool size.
    #[arg(long, env = "SIM_WORKERS")]
    workers: Option<usize>,

    /// Write the full result artifact to this JSON file.
    #[arg(long, env = "SIM_OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => match SimulationParams::load(path) {
            Ok(params) => params,
            Err(error) => {
                eprintln!("error: {error}");
                return ExitCode::FAILURE;
            }
        },
        None => SimulationParams {
            properties: vec![fund::PropertyConfig::default()],
            ..SimulationParams::default()
        },
    };

    if let Some(days) = args.days {
        params.general.num_days = days;
    }
    if let Some(seed) = args.seed {
        params.general.random_seed = seed;
    }
    if let Some(workers) = args.workers {
        params.market.workers = Some(workers);
    }

    let num_days = params.general.num_days;
    let seed = params.general.random_seed;

    let mut market = match Market::new(params) {
        Ok(market) => market,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("╔══════════════════════════════════════════════════════════╗");
    eprintln!("║  FII Market Simulation                                   ║");
    eprintln!("╠══════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Days: {:6}  │  Agents: {:6}  │  Seed: {:<10}     ║",
        num_days,
        market.registry().len(),
        seed
    );
    eprintln!(
        "║  Workers: {:3}  │  Initial price: {:<16}        ║",
        market.worker_threads(),
        format!("{}", market.fund().current_price())
    );
    eprintln!("╚══════════════════════════════════════════════════════════╝");

    let result = market.run();
    print_summary(&result);

    if let Some(path) = &args.output {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                if let Err(error) = std::fs::write(path, json) {
                    eprintln!("error: failed to write {}: {error}", path.display());
                    return ExitCode::FAILURE;
                }
                eprintln!("Results written to {}", path.display());
            }
            Err(error) => {
                eprintln!("error: failed to serialize results: {error}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_summary(result: &SimulationResult) {
    let final_sentiment = result.mean_sentiment.last().copied().unwrap_or(0.0);

    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════╗");
    eprintln!("║  Simulation Complete                                     ║");
    eprintln!("╠══════════════════════════════════════════════════════════╣");
    eprintln!(
        "║  Final price: R${:<12.2} │  Mean sentiment: {:>7.4}  ║",
        result.final_price(),
        final_sentiment
    );
    eprintln!(
        "║  Trades: {:8}  │  Volume: {:10}  │  NAV: {:>7.2} ║",
        result.total_trades, result.total_volume, result.fund.book_value_per_share
    );
    eprintln!(
        "║  Agent wealth: R${:<14.2} │  Failures: {:8}   ║",
        result.total_agent_wealth(),
        result.total_failures
    );
    eprintln!("╚══════════════════════════════════════════════════════════╝");
}
