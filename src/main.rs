//! Triangular arbitrage surface scanner entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use triarb::config::Config;
use triarb::market::{parse_pairs, Fetcher, PoloniexClient, TickerPrices, TradeableSymbols};
use triarb::metrics;
use triarb::store;
use triarb::triangle::{
    join_all, structure_triangles, DedupStrategy, FormattedTriangle, StructureOptions,
};

/// Triangular arbitrage surface scanner.
#[derive(Parser, Debug)]
#[command(name = "triarb")]
#[command(about = "Finds coin triangles among an exchange's tradeable pairs and prices their legs")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Override TRIANGLES_PATH.
    #[arg(long, global = true)]
    triangles_path: Option<PathBuf>,

    /// Override DEDUP_STRATEGY (canonical, first-seen).
    #[arg(long, global = true)]
    strategy: Option<DedupStrategy>,

    /// Enumerate starting pairs in parallel.
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch tradeable pairs, build the triangle set and persist it.
    Structure,

    /// Load the persisted triangle set and price it against one quote snapshot.
    Prices {
        /// Override PACING_MS.
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Structure, then price (default).
    Run {
        /// Override PACING_MS.
        #[arg(long)]
        pacing_ms: Option<u64>,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("triarb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(args.json.then(|| fmt::layer().json()))
        .with((!args.json).then(|| fmt::layer()))
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&args).await,
        Some(Command::Structure) => {
            let config = load_config(&args, None)?;
            start_exporter(&config);
            cmd_structure(&config).await.map(|_| ())
        }
        Some(Command::Prices { pacing_ms }) => {
            let config = load_config(&args, pacing_ms)?;
            start_exporter(&config);
            cmd_prices(&config).await
        }
        Some(Command::Run { pacing_ms }) => {
            let config = load_config(&args, pacing_ms)?;
            start_exporter(&config);
            cmd_run(&config).await
        }
        None => {
            let config = load_config(&args, None)?;
            start_exporter(&config);
            cmd_run(&config).await
        }
    }
}

/// Load configuration, apply CLI overrides, validate.
fn load_config(args: &Args, pacing_ms: Option<u64>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(path) = &args.triangles_path {
        config.triangles_path = path.clone();
    }
    if let Some(strategy) = args.strategy {
        config.dedup_strategy = strategy;
    }
    if args.parallel {
        config.parallel = true;
    }
    if let Some(pacing_ms) = pacing_ms {
        config.pacing_ms = pacing_ms;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}

fn start_exporter(config: &Config) {
    if !config.metrics_enabled {
        return;
    }
    if let Err(e) = metrics::install_exporter(config.metrics_port) {
        warn!("Metrics exporter not started: {}", e);
    }
}

/// Check configuration validity.
async fn cmd_check_config(args: &Args) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TRIARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match load_config(args, None) {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration check failed"));
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Markets URL: {}", config.markets_url);
    println!("  Ticker URL: {}", config.ticker_url);
    println!("  Tradeable State: {}", config.tradeable_state);
    println!("  Triangles Path: {}", config.triangles_path.display());
    println!("  Dedup Strategy: {}", config.dedup_strategy);
    println!("  Parallel: {}", config.parallel);
    println!("  Pacing: {}ms", config.pacing_ms);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("Enabled (port {})", config.metrics_port)
        } else {
            "Disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch tradeable pairs, structure triangles and persist them.
async fn cmd_structure(config: &Config) -> anyhow::Result<Vec<FormattedTriangle>> {
    let client = PoloniexClient::new(config)?;
    let fetcher = TradeableSymbols::new(client, config.tradeable_state.clone());

    info!(source = fetcher.name(), "Fetching tradeable symbols...");
    let symbols = fetcher.fetch().await.context("fetching tradeable symbols")?;
    let pairs = parse_pairs(&symbols)?;
    info!(pairs = pairs.len(), "Tradeable pairs loaded");

    let options = StructureOptions {
        strategy: config.dedup_strategy,
        parallel: config.parallel,
    };
    let triangles =
        tokio::task::spawn_blocking(move || structure_triangles(&pairs, options)).await?;

    store::save(&config.triangles_path, &triangles)?;
    info!(
        triangles = triangles.len(),
        path = %config.triangles_path.display(),
        "Triangle set persisted"
    );

    Ok(triangles)
}

/// Load the persisted set, fetch one snapshot and print each priced triangle.
async fn cmd_prices(config: &Config) -> anyhow::Result<()> {
    let triangles = store::load(&config.triangles_path)?;
    price_triangles(config, &triangles).await
}

/// Structure, then price.
async fn cmd_run(config: &Config) -> anyhow::Result<()> {
    cmd_structure(config).await?;
    // Reload so the priced set is exactly what was persisted.
    cmd_prices(config).await
}

async fn price_triangles(config: &Config, triangles: &[FormattedTriangle]) -> anyhow::Result<()> {
    let client = PoloniexClient::new(config)?;
    let fetcher = TickerPrices::new(client);

    info!(source = fetcher.name(), "Fetching quote snapshot...");
    let snapshot = fetcher.fetch().await.context("fetching quote snapshot")?;
    info!(quotes = snapshot.len(), captured_at = %snapshot.captured_at, "Quote snapshot captured");

    let priced = join_all(triangles, &snapshot);

    let mut pacing = (config.pacing_ms > 0).then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(config.pacing_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut incomplete = 0usize;
    for triangle in &priced {
        if let Some(interval) = pacing.as_mut() {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    warn!("Interrupted, stopping price output");
                    break;
                }
            }
        }

        let complete = triangle.prices.len() == 6;
        if !complete {
            incomplete += 1;
        }
        metrics::inc_triangles_priced(complete);
        println!("{}", serde_json::to_string(triangle)?);
    }

    info!(
        priced = priced.len(),
        incomplete,
        "Pricing pass finished"
    );
    Ok(())
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
