//! CSV result-file report adapter.
//!
//! Writes the files the reporting collaborator consumes: a
//! `<ASSET>_trades.csv` log per asset, an aggregate
//! `backtesting_results.csv`, and `forward_testing_results.csv` with the
//! latest signal per asset. Optional numeric fields are written blank, not
//! as sentinel zeros.

use crate::domain::error::TurtleError;
use crate::domain::forward::ForwardReport;
use crate::domain::simulator::{AssetResult, Trade};
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

pub const RESULTS_FILE: &str = "backtesting_results.csv";
pub const FORWARD_FILE: &str = "forward_testing_results.csv";

pub struct CsvReportAdapter {
    folder: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    fn write_file(&self, name: &str, bytes: Vec<u8>) -> Result<(), TurtleError> {
        fs::create_dir_all(&self.folder)?;
        fs::write(self.folder.join(name), bytes)?;
        Ok(())
    }
}

fn csv_error(path: &Path, e: impl std::fmt::Display) -> TurtleError {
    TurtleError::Data {
        reason: format!("{}: csv write error: {}", path.display(), e),
    }
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write_trades(&self, asset: &str, trades: &[Trade]) -> Result<(), TurtleError> {
        let name = format!("{}_trades.csv", asset);
        let path = self.folder.join(&name);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["date", "action", "price", "size", "stop_loss", "profit"])
            .map_err(|e| csv_error(&path, e))?;
        for trade in trades {
            wtr.write_record([
                trade.date.format("%Y-%m-%d").to_string(),
                trade.action.to_string(),
                format!("{:.4}", trade.price),
                format!("{:.4}", trade.size),
                opt_cell(trade.stop_loss),
                opt_cell(trade.profit),
            ])
            .map_err(|e| csv_error(&path, e))?;
        }
        let bytes = wtr.into_inner().map_err(|e| csv_error(&path, e))?;
        self.write_file(&name, bytes)
    }

    fn write_results(&self, results: &[AssetResult]) -> Result<(), TurtleError> {
        let path = self.folder.join(RESULTS_FILE);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["asset", "total_profit", "number_of_trades"])
            .map_err(|e| csv_error(&path, e))?;
        for result in results {
            wtr.write_record([
                result.asset.clone(),
                format!("{:.2}", result.total_profit),
                result.trade_count.to_string(),
            ])
            .map_err(|e| csv_error(&path, e))?;
        }
        let bytes = wtr.into_inner().map_err(|e| csv_error(&path, e))?;
        self.write_file(RESULTS_FILE, bytes)
    }

    fn write_forward(&self, reports: &[ForwardReport]) -> Result<(), TurtleError> {
        let path = self.folder.join(FORWARD_FILE);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "asset",
            "date",
            "signal",
            "close",
            "atr",
            "entry_price",
            "stop_loss",
            "take_profit",
        ])
        .map_err(|e| csv_error(&path, e))?;
        for report in reports {
            wtr.write_record([
                report.asset.clone(),
                report.date.format("%Y-%m-%d").to_string(),
                report.signal.to_string(),
                format!("{:.4}", report.close),
                opt_cell(report.atr),
                opt_cell(report.entry_price),
                opt_cell(report.stop_loss),
                opt_cell(report.take_profit),
            ])
            .map_err(|e| csv_error(&path, e))?;
        }
        let bytes = wtr.into_inner().map_err(|e| csv_error(&path, e))?;
        self.write_file(FORWARD_FILE, bytes)
    }
}
