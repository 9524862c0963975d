//! SpreadScan Binary
//!
//! Entry point for screening tickers, building spread recommendations and
//! printing fee and exit-level arithmetic.

mod output;
mod providers;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Cli, Commands, SideArg};
use common::{MarketDataSnapshot, OptionSide, Ticker};
use config::{generate_default_config, load_config, save_config, validate_config, AppConfig, OcoConfig};
use market_data::{
    fetch_bulk, nearest_expiry_on_or_after, MarketDataProvider, OptionChainProvider,
};
use observability::{init_logging, init_metrics, LogFormat, ScanMetrics};
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use trade_engine::{
    compute_oco_levels, expiry_for_dte, recommend_trade, validate_trade, FeeModel, ScannerEngine,
    TradeLogEntry, TradeRecommendationRequest,
};

use crate::providers::Providers;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let log_format = cli
        .log_format
        .and_then(|arg| LogFormat::parse(arg.as_str()))
        .or_else(|| cli.command.config_path().and_then(configured_log_format))
        .unwrap_or_default();
    init_logging("spreadscan", log_format)?;
    debug!(?cli, "CLI arguments parsed");

    if let Some(port) = cli.metrics_port {
        init_metrics(port)?;
    }
    let metrics = ScanMetrics::new("cli");

    match cli.command {
        Commands::Scan {
            config,
            tickers,
            json,
        } => {
            info!("Executing 'scan' command");
            scan_command(config, tickers, json, &metrics).await
        }
        Commands::Recommend {
            config,
            ticker,
            side,
            dte,
            delta,
            width,
            json,
        } => {
            info!("Executing 'recommend' command");
            let args = RecommendArgs {
                ticker,
                side: option_side(side),
                dte,
                delta,
                width,
                json,
            };
            recommend_command(config, args, &metrics).await
        }
        Commands::Fees {
            side,
            quantity,
            index,
            futures,
            config,
        } => fees_command(option_side(side), quantity, index, futures, config.as_deref()),
        Commands::Oco {
            credit,
            take_profit,
            stop_loss,
            time_stop_days,
        } => oco_command(credit, take_profit, stop_loss, time_stop_days),
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(config)
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

fn option_side(side: SideArg) -> OptionSide {
    match side {
        SideArg::Call => OptionSide::Call,
        SideArg::Put => OptionSide::Put,
    }
}

/// Log format from the config file; runs before logging is set up
fn configured_log_format(path: &Path) -> Option<LogFormat> {
    load_config(path)
        .ok()
        .and_then(|config| LogFormat::parse(&config.logging.format))
}

/// Load a config and refuse to continue on validation errors
fn load_checked_config(path: &Path) -> Result<AppConfig> {
    let config = load_config(path)?;
    let report = validate_config(&config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot continue due to configuration errors");
    }

    Ok(config)
}

async fn scan_command<P: AsRef<Path>>(
    config_path: P,
    tickers: Vec<String>,
    json: bool,
    metrics: &ScanMetrics,
) -> Result<()> {
    let config = load_checked_config(config_path.as_ref())?;
    let providers = Providers::from_settings(&config.market_data)?;

    let universe = if tickers.is_empty() {
        config.market_data.tickers.clone()
    } else {
        tickers
    };
    let tickers: Vec<Ticker> = universe
        .into_iter()
        .map(Ticker::new)
        .filter(|ticker| !ticker.is_empty())
        .collect();
    if tickers.is_empty() {
        anyhow::bail!("No tickers to scan: pass --tickers or set market_data.tickers");
    }

    let engine = ScannerEngine::new(config.scanner.clone())?;

    let started = Instant::now();
    let fetch = fetch_bulk(providers.market.as_ref(), &tickers).await;
    metrics.record_fetch_failures(fetch.failure_count());

    let results = engine.scan_tickers(&tickers, &fetch.into_map());
    let passed = results.iter().filter(|r| r.passes).count();
    metrics.record_scan(started.elapsed(), results.len(), passed);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        output::print_scan(&engine, &results);
    }

    Ok(())
}

struct RecommendArgs {
    ticker: String,
    side: OptionSide,
    dte: Option<u32>,
    delta: Option<f64>,
    width: Option<f64>,
    json: bool,
}

async fn recommend_command<P: AsRef<Path>>(
    config_path: P,
    args: RecommendArgs,
    metrics: &ScanMetrics,
) -> Result<()> {
    let config = load_checked_config(config_path.as_ref())?;
    let providers = Providers::from_settings(&config.market_data)?;
    let chains = providers.chains.as_ref().with_context(|| {
        format!(
            "Provider '{}' does not serve option chains",
            config.market_data.provider.as_str()
        )
    })?;

    let today = Utc::now().date_naive();
    let ticker = Ticker::new(args.ticker);
    let request = TradeRecommendationRequest {
        ticker: ticker.clone(),
        side: args.side,
        dte: args.dte.unwrap_or(config.scanner.min_dte),
        target_delta: args.delta.unwrap_or(config.scanner.target_delta),
        width: args.width.unwrap_or(config.scanner.spread_width.as_f64()),
    };
    request.validate()?;

    let expirations = chains
        .expirations(&ticker)
        .await
        .with_context(|| format!("Failed to list expirations for {}", ticker))?;
    let expiry = nearest_expiry_on_or_after(&expirations, expiry_for_dte(today, request.dte))
        .with_context(|| format!("No {} expiry {} or more days out", ticker, request.dte))?;
    let chain = chains
        .option_chain(&ticker, expiry)
        .await
        .with_context(|| format!("Failed to fetch {} chain for {}", ticker, expiry))?;

    let fee_model = FeeModel::new(config.fees.clone());
    let recommendation = match recommend_trade(&chain, &request, &fee_model, &config.oco, today) {
        Ok(rec) => rec,
        Err(e) => {
            metrics.record_spread_failure(e.kind());
            return Err(e.into());
        }
    };

    let snapshot = match providers.market.market_data(&ticker).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(%ticker, error = %e, "Market data unavailable, validating without it");
            MarketDataSnapshot::placeholder(ticker.clone())
        }
    };
    let validation = validate_trade(&ticker, &snapshot, &recommendation.trade_data());

    let entry = TradeLogEntry::from_recommendation(&recommendation, Utc::now())
        .with_provider(config.market_data.provider.as_str());

    if args.json {
        let report = output::RecommendReport {
            recommendation: &recommendation,
            validation: &validation,
            journal_entry: &entry,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_recommendation(&recommendation, &validation, &entry);
    }

    Ok(())
}

fn fees_command(
    side: OptionSide,
    quantity: u32,
    index: bool,
    futures: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let quantity = NonZeroU32::new(quantity).context("Quantity must be at least 1")?;
    let schedule = match config_path {
        Some(path) => load_checked_config(path)?.fees,
        None => Default::default(),
    };

    let fees = FeeModel::new(schedule).compute(side, quantity, index, futures);
    output::print_fees(side, quantity.get(), &fees);
    Ok(())
}

fn oco_command(
    credit: f64,
    take_profit: Option<f64>,
    stop_loss: Option<f64>,
    time_stop_days: Option<u32>,
) -> Result<()> {
    let defaults = OcoConfig::default();
    let config = OcoConfig::new(
        take_profit.unwrap_or(defaults.take_profit_percent),
        stop_loss.unwrap_or(defaults.stop_loss_multiplier),
        time_stop_days.unwrap_or(defaults.time_stop_days),
    )?;

    let levels = compute_oco_levels(credit, &config);
    output::print_oco(credit, &levels);
    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    let filters = &config.scanner;
    println!("[ok] Configuration is valid!");
    println!();
    println!("DTE window: {}-{} days", filters.min_dte, filters.max_dte);
    println!("IVR: min {}, preferred {}", filters.min_ivr, filters.preferred_ivr);
    println!("Target delta: {} +/- {}", filters.target_delta, filters.delta_range);
    println!("Spread width: {}", filters.spread_width);
    println!("Provider: {}", config.market_data.provider.as_str());
    println!("Tickers: {}", config.market_data.tickers.len());

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point market_data.fixture_path at a fixture, or switch the provider to polygon");
    println!("  2. Set required environment variables (e.g. POLYGON_API_KEY)");
    println!(
        "  3. Run 'spreadscan validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  4. Run 'spreadscan scan --config {:?}' to scan the configured tickers",
        output_path
    );

    Ok(())
}
