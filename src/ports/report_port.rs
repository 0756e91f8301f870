//! Result reporting port trait.

use crate::domain::error::TurtleError;
use crate::domain::forward::ForwardReport;
use crate::domain::simulator::{AssetResult, Trade};

pub trait ReportPort {
    /// Full trade log for one asset.
    fn write_trades(&self, asset: &str, trades: &[Trade]) -> Result<(), TurtleError>;

    /// Aggregate profit/trade-count rows for a backtest run.
    fn write_results(&self, results: &[AssetResult]) -> Result<(), TurtleError>;

    /// Latest-signal rows from forward evaluation.
    fn write_forward(&self, reports: &[ForwardReport]) -> Result<(), TurtleError>;
}
