//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::config_validation::{validate_run_config, validate_strategy_config};
use crate::domain::engine::{run_simulation, SimulationConfig, SimulationResult};
use crate::domain::error::QuantsimError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::market_data::AssetData;
use crate::domain::metrics::Metrics;
use crate::domain::risk::RiskLimits;
use crate::domain::strategy::{BuyAndHold, SmaCrossover, Strategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantsim", about = "Execution-aware trading strategy simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Simulate a single symbol instead of the configured universe
        #[arg(long)]
        symbol: Option<String>,
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Run with and without execution costs and report the friction drag
        #[arg(long)]
        compare_costs: bool,
    },
    /// Validate a configuration and probe data availability per symbol
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show version information
    Info,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            symbol,
            seed,
            compare_costs,
        } => run_backtest(
            &config,
            output.as_ref(),
            symbol.as_deref(),
            seed,
            compare_costs,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info => run_info(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantsimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Everything a run needs beyond the engine's own [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub risk_free_rate: f64,
    pub csv_dir: PathBuf,
    pub simulation: SimulationConfig,
}

pub fn build_run_settings(adapter: &dyn ConfigPort) -> Result<RunSettings, QuantsimError> {
    let start_str = adapter
        .get_string("backtest", "start_date")
        .ok_or_else(|| QuantsimError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })?;
    let end_str = adapter.get_string("backtest", "end_date").ok_or_else(|| {
        QuantsimError::ConfigMissing {
            section: "backtest".into(),
            key: "end_date".into(),
        }
    })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        QuantsimError::ConfigInvalid {
            section: "backtest".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        QuantsimError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    let execution = if adapter.get_bool("backtest", "execution_costs", true) {
        Some(build_execution_config(adapter))
    } else {
        None
    };

    let seed = match adapter.get_string("backtest", "seed") {
        Some(s) => Some(s.trim().parse::<u64>().map_err(|_| {
            QuantsimError::ConfigInvalid {
                section: "backtest".into(),
                key: "seed".into(),
                reason: "seed must be a non-negative integer".into(),
            }
        })?),
        None => None,
    };

    Ok(RunSettings {
        start_date,
        end_date,
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", 0.0),
        csv_dir: PathBuf::from(
            adapter
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| "./data".to_string()),
        ),
        simulation: SimulationConfig {
            initial_capital: adapter.get_double("backtest", "initial_capital", 100_000.0),
            risk_limits: RiskLimits {
                target_volatility: adapter.get_double("backtest", "target_volatility", 0.20),
                max_drawdown_limit: adapter.get_double("backtest", "max_drawdown_limit", 0.20),
            },
            execution,
            seed,
        },
    })
}

fn build_execution_config(adapter: &dyn ConfigPort) -> ExecutionConfig {
    ExecutionConfig {
        mean_latency_ms: adapter.get_double("backtest", "mean_latency_ms", 100.0),
        std_latency_ms: adapter.get_double("backtest", "std_latency_ms", 20.0),
        spread_bps: adapter.get_double("backtest", "spread_bps", 5.0),
    }
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Box<dyn Strategy> {
    let name = adapter
        .get_string("strategy", "name")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    // Unknown names are rejected by validate_strategy_config before this
    // is reached.
    match name.as_str() {
        "buy-and-hold" => Box::new(BuyAndHold),
        _ => Box::new(SmaCrossover::new(
            adapter.get_int("strategy", "short_window", 50).max(1) as usize,
            adapter.get_int("strategy", "long_window", 200).max(1) as usize,
        )),
    }
}

/// Symbols from the override or the config's comma-separated list,
/// uppercased, with duplicates dropped and order preserved.
pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(s) = symbol_override {
        return vec![s.trim().to_uppercase()];
    }

    let mut symbols = Vec::new();
    if let Some(list) = config.get_string("backtest", "symbols") {
        for token in list.split(',') {
            let symbol = token.trim().to_uppercase();
            if !symbol.is_empty() && !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
    }
    symbols
}

/// Fetch each symbol's bars, skipping (with a warning) symbols whose data
/// cannot be fetched or is empty. The surviving universe is sorted so runs
/// are reproducible regardless of config ordering.
pub fn load_universe(
    data_port: &dyn DataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<AssetData>, QuantsimError> {
    let mut assets = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let bars = match data_port.fetch_ohlcv(symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
                continue;
            }
        };
        if bars.is_empty() {
            eprintln!("warning: skipping {} (no data in range)", symbol);
            continue;
        }
        eprintln!("  {}: {} bars [OK]", symbol, bars.len());
        assets.push(AssetData::new(symbol.clone(), bars));
    }

    if assets.is_empty() {
        return Err(QuantsimError::Data {
            reason: "no symbols with usable data in the configured range".into(),
        });
    }

    assets.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(assets)
}

fn run_backtest(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    symbol_override: Option<&str>,
    seed_override: Option<u64>,
    compare_costs: bool,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate run and strategy config
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build settings and strategy
    let mut settings = match build_run_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(seed) = seed_override {
        settings.simulation.seed = Some(seed);
    }
    let strategy = build_strategy(&adapter);
    eprintln!("Loading strategy: {}", strategy.name());

    // Stage 4: Resolve universe
    let symbols = resolve_symbols(symbol_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }
    eprintln!("Validating {} symbols...", symbols.len());

    let data_port = CsvAdapter::new(settings.csv_dir.clone());
    let assets = match load_universe(&data_port, &symbols, settings.start_date, settings.end_date)
    {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Simulate
    eprintln!(
        "Running simulation: {} symbols, {} to {}",
        assets.len(),
        settings.start_date,
        settings.end_date,
    );

    let result = match run_simulation(&assets, strategy.as_ref(), &settings.simulation) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Metrics and console summary
    let metrics = Metrics::compute(&result.returns(), settings.risk_free_rate);
    print_summary(&result, &metrics);

    // Stage 7: Optional cost-impact comparison
    if compare_costs {
        if let Some(code) = run_cost_comparison(&assets, strategy.as_ref(), &settings, &result) {
            return code;
        }
    }

    // Stage 8: Report
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report.txt"));
    let report = TextReportAdapter::new();
    match report.write(&result, &metrics, strategy.name(), &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            eprintln!(
                "Equity curve written to: {}",
                output.with_extension("csv").display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn print_summary(result: &SimulationResult, metrics: &Metrics) {
    eprintln!("\n=== Results ===");
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", metrics.annualized_return * 100.0);
    eprintln!("Volatility:       {:.2}%", metrics.annualized_volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", metrics.sortino_ratio);
    eprintln!("Max Drawdown:     {:.2}%", metrics.max_drawdown * 100.0);
    eprintln!("VaR 95%:          {:.2}%", metrics.var_95 * 100.0);
    eprintln!("CVaR 95%:         {:.2}%", metrics.cvar_95 * 100.0);
    eprintln!("Trades:           {}", result.ledger.trades.len());
    eprintln!("Final Value:      {:.2}", result.final_value());
    if result.kill_switch_triggered {
        eprintln!("Kill Switch:      TRIGGERED during run");
    }
}

/// Re-run the identical simulation with costs toggled and report the drag
/// (frictionless return minus realistic return). Returns an exit code only
/// on failure.
fn run_cost_comparison(
    assets: &[AssetData],
    strategy: &dyn Strategy,
    settings: &RunSettings,
    realistic: &SimulationResult,
) -> Option<ExitCode> {
    let mut perfect_config = settings.simulation.clone();
    perfect_config.execution = None;

    let mut friction_config = settings.simulation.clone();
    if friction_config.execution.is_none() {
        // Costs were disabled in the config; compare against the documented
        // execution defaults instead.
        friction_config.execution = Some(ExecutionConfig::default());
    }

    let perfect = match run_simulation(assets, strategy, &perfect_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return Some((&e).into());
        }
    };
    let with_costs = if settings.simulation.execution.is_some() {
        realistic.clone()
    } else {
        match run_simulation(assets, strategy, &friction_config) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return Some((&e).into());
            }
        }
    };

    let perfect_metrics = Metrics::compute(&perfect.returns(), settings.risk_free_rate);
    let friction_metrics = Metrics::compute(&with_costs.returns(), settings.risk_free_rate);
    let drag = perfect_metrics.total_return - friction_metrics.total_return;

    eprintln!("\n=== Cost Impact ===");
    eprintln!(
        "Frictionless return:  {:.2}%",
        perfect_metrics.total_return * 100.0
    );
    eprintln!(
        "Realistic return:     {:.2}%",
        friction_metrics.total_return * 100.0
    );
    eprintln!("Friction drag:        {:.2}%", drag * 100.0);
    None
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let settings = match build_run_settings(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = resolve_symbols(None, &adapter);
    let data_port = CsvAdapter::new(settings.csv_dir.clone());

    eprintln!("\nData availability:");
    let mut usable = 0usize;
    for symbol in &symbols {
        match data_port.fetch_ohlcv(symbol, settings.start_date, settings.end_date) {
            Ok(bars) if !bars.is_empty() => {
                eprintln!(
                    "  {}: {} bars, {} to {}",
                    symbol,
                    bars.len(),
                    bars[0].date,
                    bars[bars.len() - 1].date
                );
                usable += 1;
            }
            Ok(_) => eprintln!("  {}: no data in range", symbol),
            Err(e) => eprintln!("  {}: {}", symbol, e),
        }
    }

    if usable == 0 {
        eprintln!("\nerror: no symbols with usable data");
        return ExitCode::from(3);
    }

    eprintln!("\n{} of {} symbols have data", usable, symbols.len());
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let csv_dir = PathBuf::from(
        adapter
            .get_string("data", "csv_dir")
            .unwrap_or_else(|| "./data".to_string()),
    );
    let data_port = CsvAdapter::new(csv_dir);

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info() -> ExitCode {
    println!("quantsim {}", env!("CARGO_PKG_VERSION"));
    println!("execution-aware trading strategy simulator");
    ExitCode::SUCCESS
}
