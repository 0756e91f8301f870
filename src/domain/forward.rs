//! Out-of-sample single-point evaluation.
//!
//! Re-runs the indicator calculation over a recent bar window with a stored
//! parameter set and reports only the last row — the current decision-support
//! view. No simulation, no state between calls.

use crate::domain::indicator::{self, Signal};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::TurtleParams;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct ForwardReport {
    pub asset: String,
    pub date: NaiveDate,
    pub signal: Signal,
    pub close: f64,
    pub atr: Option<f64>,
    /// Breakout level a Buy would enter against. Populated with the stop and
    /// target only when the latest signal is Buy.
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

/// Evaluate the latest bar of `bars` under `params`. Returns `None` for an
/// empty window.
pub fn evaluate(asset: &str, bars: &[OhlcvBar], params: &TurtleParams) -> Option<ForwardReport> {
    let rows = indicator::compute(bars, params);
    let last = rows.last()?;

    let (entry_price, stop_loss, take_profit) = if last.signal == Signal::Buy {
        (last.entry_high, last.stop_loss, last.take_profit)
    } else {
        (None, None, None)
    };

    Some(ForwardReport {
        asset: asset.to_string(),
        date: last.bar.date,
        signal: last.signal,
        close: last.bar.close,
        atr: last.atr,
        entry_price,
        stop_loss,
        take_profit,
    })
}
