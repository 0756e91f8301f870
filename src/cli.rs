//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_params_adapter::CsvParamsAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    parse_date, require_multiplier_list, require_period_list, validate_backtest_config,
    validate_engine_config, validate_optimize_config,
};
use crate::domain::error::TurtleError;
use crate::domain::forward::{self, ForwardReport};
use crate::domain::indicator;
use crate::domain::optimizer;
use crate::domain::params::{EngineSettings, ParamGrid, StoredParams};
use crate::domain::simulator::{self, AssetResult};
use crate::domain::universe::{parse_tickers, validate_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::params_port::ParamsPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_PARAMS_FILE: &str = "optimized_params.csv";
const DEFAULT_RESULTS_FOLDER: &str = "results";

#[derive(Parser, Debug)]
#[command(name = "turtlebt", about = "Turtle breakout strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the parameter grid over the training window and store the
    /// most profitable tuple per asset
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Replay stored parameters over the test window and write trade logs
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Evaluate the latest bar per asset and report the current signal
    Forward {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// List tickers with data files in the configured folder
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without touching any data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Optimize { config, ticker } => run_optimize(&config, ticker.as_deref()),
        Command::Backtest { config, ticker } => run_backtest(&config, ticker.as_deref()),
        Command::Forward { config, ticker } => run_forward(&config, ticker.as_deref()),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_engine_settings(config: &dyn ConfigPort) -> EngineSettings {
    let defaults = EngineSettings::default();
    EngineSettings {
        atr_period: config.get_int("engine", "atr_period", defaults.atr_period as i64) as usize,
        risk_per_trade: config.get_double("engine", "risk_per_trade", defaults.risk_per_trade),
        initial_balance: config.get_double("engine", "initial_balance", defaults.initial_balance),
    }
}

pub fn build_param_grid(config: &dyn ConfigPort) -> Result<ParamGrid, TurtleError> {
    Ok(ParamGrid {
        breakout_high_periods: require_period_list(config, "optimize", "breakout_high_periods")?,
        breakout_low_periods: require_period_list(config, "optimize", "breakout_low_periods")?,
        atr_multipliers: require_multiplier_list(config, "optimize", "atr_multipliers")?,
    })
}

fn data_folder(config: &dyn ConfigPort) -> Result<PathBuf, TurtleError> {
    config
        .get_string("data", "folder")
        .map(PathBuf::from)
        .ok_or_else(|| TurtleError::ConfigMissing {
            section: "data".into(),
            key: "folder".into(),
        })
}

fn params_path(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("optimize", "params_file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMS_FILE))
}

fn results_folder(config: &dyn ConfigPort, section: &str) -> PathBuf {
    config
        .get_string(section, "results_folder")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FOLDER))
}

pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, TurtleError> {
    let raw = match ticker_override {
        Some(t) => t.to_string(),
        None => {
            config
                .get_string("universe", "tickers")
                .ok_or_else(|| TurtleError::ConfigMissing {
                    section: "universe".into(),
                    key: "tickers".into(),
                })?
        }
    };
    parse_tickers(&raw).map_err(|e| TurtleError::ConfigInvalid {
        section: "universe".into(),
        key: "tickers".into(),
        reason: e.to_string(),
    })
}

fn run_optimize(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_optimize_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build settings, grid and window
    let settings = build_engine_settings(&adapter);
    let grid = match build_param_grid(&adapter) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (train_start, train_end) = match (
        parse_date(
            adapter.get_string("optimize", "train_start").as_deref(),
            "optimize",
            "train_start",
        ),
        parse_date(
            adapter.get_string("optimize", "train_end").as_deref(),
            "optimize",
            "train_end",
        ),
    ) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Resolve and validate the universe
    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match data_folder(&adapter) {
        Ok(folder) => CsvDataAdapter::new(folder),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let min_bars = grid
        .combinations(settings.atr_period)
        .iter()
        .map(|p| p.min_history())
        .max()
        .unwrap_or(settings.atr_period + 1);

    eprintln!(
        "Validating {} tickers, {} to {}...",
        tickers.len(),
        train_start,
        train_end
    );
    let validation =
        match validate_universe(&data_port, tickers, train_start, train_end, min_bars) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

    // Stage 4: Search the grid per asset
    eprintln!(
        "Optimizing {} candidates per asset over {} tickers",
        grid.len(),
        validation.tickers.len()
    );

    let mut stored: Vec<StoredParams> = Vec::with_capacity(validation.tickers.len());
    for ticker in &validation.tickers {
        let bars = match data_port.fetch_ohlcv(ticker, train_start, train_end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        let Some(best) = optimizer::optimize(
            ticker,
            &bars,
            &grid,
            settings.atr_period,
            settings.initial_balance,
            settings.risk_per_trade,
        ) else {
            eprintln!("warning: skipping {} (empty parameter grid)", ticker);
            continue;
        };

        eprintln!(
            "  {}: high={} low={} mult={} profit={:.2} ({} trades)",
            ticker,
            best.params.breakout_high_period,
            best.params.breakout_low_period,
            best.params.atr_multiplier,
            best.total_profit,
            best.trade_count,
        );
        stored.push(StoredParams {
            asset: best.asset,
            breakout_high_period: best.params.breakout_high_period,
            breakout_low_period: best.params.breakout_low_period,
            atr_multiplier: best.params.atr_multiplier,
            profit: best.total_profit,
        });
    }

    if stored.is_empty() {
        eprintln!("error: no assets could be optimized");
        return ExitCode::from(5);
    }

    // Stage 5: Persist winners
    let params_store = CsvParamsAdapter::new(params_path(&adapter));
    match params_store.store_all(&stored) {
        Ok(()) => {
            eprintln!(
                "Stored parameters for {} assets in {}",
                stored.len(),
                params_path(&adapter).display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_backtest(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Settings and window
    let settings = build_engine_settings(&adapter);
    let (test_start, test_end) = match (
        parse_date(
            adapter.get_string("backtest", "test_start").as_deref(),
            "backtest",
            "test_start",
        ),
        parse_date(
            adapter.get_string("backtest", "test_end").as_deref(),
            "backtest",
            "test_end",
        ),
    ) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Resolve universe and stored parameters
    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match data_folder(&adapter) {
        Ok(folder) => CsvDataAdapter::new(folder),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params_store = CsvParamsAdapter::new(params_path(&adapter));

    // Stage 4: Replay each asset with its stored parameters
    eprintln!(
        "Running backtest: {} tickers, {} to {}",
        tickers.len(),
        test_start,
        test_end
    );

    let report = CsvReportAdapter::new(results_folder(&adapter, "backtest"));
    let mut results: Vec<AssetResult> = Vec::with_capacity(tickers.len());

    for ticker in &tickers {
        let stored = match params_store.load(ticker) {
            Ok(Some(p)) => p,
            Ok(None) => {
                let e = TurtleError::NoParams {
                    asset: ticker.clone(),
                };
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let params = stored.to_params(settings.atr_period);

        let bars = match data_port.fetch_ohlcv(ticker, test_start, test_end) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };
        if bars.len() < params.min_history() {
            eprintln!(
                "warning: skipping {} ({} bars, minimum {} required)",
                ticker,
                bars.len(),
                params.min_history()
            );
            continue;
        }

        let rows = indicator::compute(&bars, &params);
        let sim = simulator::simulate(&rows, settings.initial_balance, settings.risk_per_trade);

        if let Err(e) = report.write_trades(ticker, &sim.trades) {
            eprintln!("error: {e}");
            return (&e).into();
        }

        if let Some(open) = &sim.open_position {
            eprintln!(
                "  {}: position still open (entry {:.2} on {})",
                ticker, open.entry_price, open.entry_date
            );
        }
        results.push(AssetResult {
            asset: ticker.clone(),
            total_profit: sim.total_profit,
            trade_count: sim.trade_count(),
        });
    }

    if results.is_empty() {
        eprintln!("error: no assets could be backtested");
        return ExitCode::from(5);
    }

    // Stage 5: Summarize and persist aggregate results
    eprintln!("\n=== Backtest Results ===");
    for r in &results {
        let sign = if r.total_profit >= 0.0 { "+" } else { "" };
        eprintln!(
            "  {}: {}{:.2} over {} trades",
            r.asset, sign, r.total_profit, r.trade_count
        );
    }

    match report.write_results(&results) {
        Ok(()) => {
            eprintln!(
                "\nResults written to {}",
                results_folder(&adapter, "backtest").display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_forward(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_engine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Universe and stored parameters
    let settings = build_engine_settings(&adapter);
    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match data_folder(&adapter) {
        Ok(folder) => CsvDataAdapter::new(folder),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params_store = CsvParamsAdapter::new(params_path(&adapter));

    // Stage 3: Evaluate the latest bar per asset
    eprintln!("Evaluating latest signals for {} tickers", tickers.len());

    let mut reports: Vec<ForwardReport> = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        let stored = match params_store.load(ticker) {
            Ok(Some(p)) => p,
            Ok(None) => {
                let e = TurtleError::NoParams {
                    asset: ticker.clone(),
                };
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let params = stored.to_params(settings.atr_period);

        let bars = match data_port.fetch_ohlcv(ticker, chrono::NaiveDate::MIN, chrono::NaiveDate::MAX)
        {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                continue;
            }
        };

        let Some(report) = forward::evaluate(ticker, &bars, &params) else {
            eprintln!("warning: skipping {} (no bars)", ticker);
            continue;
        };

        match report.entry_price {
            Some(entry) => eprintln!(
                "  {} [{}]: {} at {:.2}, entry {:.2}, stop {:.2}",
                ticker,
                report.date,
                report.signal,
                report.close,
                entry,
                report.stop_loss.unwrap_or(f64::NAN),
            ),
            None => eprintln!(
                "  {} [{}]: {} at {:.2}",
                ticker, report.date, report.signal, report.close
            ),
        }
        reports.push(report);
    }

    if reports.is_empty() {
        eprintln!("error: no assets could be evaluated");
        return ExitCode::from(5);
    }

    // Stage 4: Persist the signal report
    let writer = CsvReportAdapter::new(results_folder(&adapter, "forward"));
    match writer.write_forward(&reports) {
        Ok(()) => {
            eprintln!(
                "\nForward report written to {}",
                results_folder(&adapter, "forward").display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_port = match data_folder(&adapter) {
        Ok(folder) => CsvDataAdapter::new(folder),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match data_port.list_tickers() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if tickers.is_empty() {
        eprintln!("No data files found");
        return ExitCode::SUCCESS;
    }

    for ticker in &tickers {
        match data_port.data_range(ticker) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", ticker, count, min_date, max_date);
            }
            Ok(None) => {
                println!("{}: no rows", ticker);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", ticker, e);
            }
        }
    }
    eprintln!("{} tickers found", tickers.len());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for result in [
        validate_engine_config(&adapter),
        validate_optimize_config(&adapter),
        validate_backtest_config(&adapter),
    ] {
        if let Err(e) = result {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    match resolve_tickers(None, &adapter) {
        Ok(tickers) => eprintln!("Universe: {}", tickers.join(", ")),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let settings = build_engine_settings(&adapter);
    eprintln!(
        "Engine: atr_period={} risk_per_trade={} initial_balance={:.2}",
        settings.atr_period, settings.risk_per_trade, settings.initial_balance
    );
    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}
