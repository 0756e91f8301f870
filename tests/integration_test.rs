//! Integration tests for the optimize/backtest/forward pipeline.
//!
//! Tests cover:
//! - Optimize over CSV data, persist winners, replay them over the same
//!   window and reproduce the stored profit
//! - Partial universe validation (bad tickers skipped, good ones proceed)
//! - Forward evaluation of the latest bar with and without a breakout

mod common;

use common::*;
use tempfile::TempDir;
use turtlebt::adapters::csv_data_adapter::CsvDataAdapter;
use turtlebt::adapters::csv_params_adapter::CsvParamsAdapter;
use turtlebt::adapters::csv_report_adapter::{CsvReportAdapter, RESULTS_FILE};
use turtlebt::domain::error::TurtleError;
use turtlebt::domain::indicator::{self, Signal};
use turtlebt::domain::optimizer;
use turtlebt::domain::params::ParamGrid;
use turtlebt::domain::simulator::{self, AssetResult};
use turtlebt::domain::universe::validate_universe;
use turtlebt::domain::forward;
use turtlebt::ports::data_port::DataPort;
use turtlebt::ports::params_port::ParamsPort;
use turtlebt::ports::report_port::ReportPort;

fn small_grid() -> ParamGrid {
    ParamGrid {
        breakout_high_periods: vec![2, 3],
        breakout_low_periods: vec![2],
        atr_multipliers: vec![2.0],
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn optimize_persist_replay_reproduces_stored_profit() {
        let dir = TempDir::new().unwrap();
        let bars_in = breakout_series("TSLA", 110.0, &[40.0, 41.0, 42.0, 200.0, 50.0]);
        write_data_csv(dir.path(), "TSLA", &bars_in);

        let data_port = CsvDataAdapter::new(dir.path().to_path_buf());
        let bars = data_port
            .fetch_ohlcv("TSLA", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        assert_eq!(bars.len(), bars_in.len());

        let best = optimizer::optimize("TSLA", &bars, &small_grid(), 2, 100_000.0, 0.01)
            .expect("non-empty grid");
        assert!(best.trade_count > 0);

        let params_store = CsvParamsAdapter::new(dir.path().join("optimized_params.csv"));
        params_store
            .store_all(&[turtlebt::domain::params::StoredParams {
                asset: best.asset.clone(),
                breakout_high_period: best.params.breakout_high_period,
                breakout_low_period: best.params.breakout_low_period,
                atr_multiplier: best.params.atr_multiplier,
                profit: best.total_profit,
            }])
            .unwrap();

        let stored = params_store.load("TSLA").unwrap().expect("stored row");
        let params = stored.to_params(2);
        let rows = indicator::compute(&bars, &params);
        let sim = simulator::simulate(&rows, 100_000.0, 0.01);

        assert!((sim.total_profit - stored.profit).abs() < 1e-6);
        assert_eq!(sim.trade_count(), best.trade_count);
    }

    #[test]
    fn backtest_reports_land_on_disk() {
        let dir = TempDir::new().unwrap();
        let bars = breakout_series("TSLA", 110.0, &[40.0]);

        let rows = indicator::compute(&bars, &small_params());
        let sim = simulator::simulate(&rows, 100_000.0, 0.01);
        assert_eq!(sim.trade_count(), 2);

        let report = CsvReportAdapter::new(dir.path().join("results"));
        report.write_trades("TSLA", &sim.trades).unwrap();
        report
            .write_results(&[AssetResult {
                asset: "TSLA".into(),
                total_profit: sim.total_profit,
                trade_count: sim.trade_count(),
            }])
            .unwrap();

        let trades_file =
            std::fs::read_to_string(dir.path().join("results/TSLA_trades.csv")).unwrap();
        assert_eq!(trades_file.lines().count(), 3);
        assert!(trades_file.contains("Buy"));
        assert!(trades_file.contains("Sell"));

        let results_file =
            std::fs::read_to_string(dir.path().join("results").join(RESULTS_FILE)).unwrap();
        assert!(results_file.contains("TSLA"));
    }
}

mod universe_validation {
    use super::*;

    fn flat_bars(ticker: &str, count: usize) -> Vec<OhlcvBar> {
        (0..count)
            .map(|i| make_bar(ticker, i as u32, 102.0, 98.0, 100.0))
            .collect()
    }

    #[test]
    fn bad_tickers_skip_good_ones_proceed() {
        let port = MockDataPort::new()
            .with_bars("TSLA", flat_bars("TSLA", 50))
            .with_bars("ENR", flat_bars("ENR", 3))
            .with_error("RKLB", "file is garbage");

        let result = validate_universe(
            &port,
            vec!["TSLA".into(), "ENR".into(), "RKLB".into()],
            date(2024, 1, 1),
            date(2024, 12, 31),
            10,
        )
        .unwrap();

        assert_eq!(result.tickers, vec!["TSLA"]);
        assert_eq!(result.skipped.len(), 2);
    }

    #[test]
    fn all_skipped_is_an_error() {
        let port = MockDataPort::new().with_error("TSLA", "broken");
        let result = validate_universe(
            &port,
            vec!["TSLA".into()],
            date(2024, 1, 1),
            date(2024, 12, 31),
            10,
        );
        assert!(matches!(result, Err(TurtleError::InsufficientData { .. })));
    }
}

mod forward_flow {
    use super::*;

    #[test]
    fn breakout_on_last_bar_reports_entry_levels() {
        // prior channel high 102, atr (4 + 12) / 2 = 8, multiplier 2
        let bars = breakout_series("TSLA", 110.0, &[]);
        let report = forward::evaluate("TSLA", &bars, &small_params()).unwrap();

        assert_eq!(report.signal, Signal::Buy);
        assert_eq!(report.date, bars.last().unwrap().date);
        assert!((report.close - 110.0).abs() < f64::EPSILON);
        assert!((report.entry_price.unwrap() - 102.0).abs() < f64::EPSILON);
        assert!((report.stop_loss.unwrap() - 86.0).abs() < f64::EPSILON);
        assert!((report.take_profit.unwrap() - 118.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quiet_last_bar_reports_hold_without_levels() {
        let bars: Vec<OhlcvBar> = (0..8)
            .map(|i| make_bar("TSLA", i, 102.0, 98.0, 100.0))
            .collect();
        let report = forward::evaluate("TSLA", &bars, &small_params()).unwrap();

        assert_eq!(report.signal, Signal::Hold);
        assert!(report.entry_price.is_none());
        assert!(report.stop_loss.is_none());
        assert!(report.take_profit.is_none());
    }

    #[test]
    fn forward_report_file_contains_each_asset() {
        let dir = TempDir::new().unwrap();
        let buy = forward::evaluate(
            "TSLA",
            &breakout_series("TSLA", 110.0, &[]),
            &small_params(),
        )
        .unwrap();
        let hold = forward::evaluate(
            "ENR",
            &breakout_series("ENR", 100.0, &[100.0]),
            &small_params(),
        )
        .unwrap();

        let writer = CsvReportAdapter::new(dir.path().join("forward"));
        writer.write_forward(&[buy, hold]).unwrap();

        let content = std::fs::read_to_string(
            dir.path().join("forward").join("forward_testing_results.csv"),
        )
        .unwrap();
        assert!(content.contains("TSLA"));
        assert!(content.contains("ENR"));
        assert!(content.contains("Buy"));
        assert!(content.contains("Hold"));
    }
}
