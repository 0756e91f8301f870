//! Turtle signal calculation.
//!
//! Turns an ordered bar sequence into a same-length sequence of
//! [`IndicatorRow`]s carrying volatility (true range / ATR), breakout
//! channel levels, the Buy/Sell/Hold signal and the risk levels for a Buy.
//! Every derived field is `Option<f64>` and stays `None` until its rolling
//! window has warmed up; warm-up bars always signal `Hold`.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::TurtleParams;
use crate::domain::rolling::{RollingMax, RollingMean, RollingMin};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
            Signal::Hold => write!(f, "Hold"),
        }
    }
}

/// A bar plus everything derived from it.
#[derive(Debug, Clone)]
pub struct IndicatorRow {
    pub bar: OhlcvBar,
    pub true_range: Option<f64>,
    pub atr: Option<f64>,
    pub entry_high: Option<f64>,
    pub exit_low: Option<f64>,
    pub signal: Signal,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

/// Compute indicator rows for `bars` under `params`.
///
/// The breakout levels for bar `t` are read from the rolling windows before
/// bar `t` itself is pushed, so `entry_high(t)` covers exactly the
/// `breakout_high_period` bars strictly before `t` and a bar can never
/// trigger a breakout against its own high. The ATR window, by contrast,
/// includes bar `t`'s true range.
pub fn compute(bars: &[OhlcvBar], params: &TurtleParams) -> Vec<IndicatorRow> {
    let mut high_window = RollingMax::new(params.breakout_high_period);
    let mut low_window = RollingMin::new(params.breakout_low_period);
    let mut atr_window = RollingMean::new(params.atr_period);
    let mut prev_close: Option<f64> = None;

    let mut rows = Vec::with_capacity(bars.len());

    for bar in bars {
        let entry_high = high_window.value();
        let exit_low = low_window.value();

        let true_range = match prev_close {
            Some(pc) if bar.high.is_finite() && bar.low.is_finite() => Some(bar.true_range(pc)),
            _ => None,
        };
        // An undefined true range (first bar, or a bad one) poisons the ATR
        // window until `atr_period` clean values follow.
        atr_window.push(true_range.unwrap_or(f64::NAN));
        let atr = atr_window.value();

        let signal = if !bar.close.is_finite() {
            Signal::Hold
        } else if entry_high.is_some_and(|eh| bar.close > eh) {
            Signal::Buy
        } else if exit_low.is_some_and(|el| bar.close < el) {
            Signal::Sell
        } else {
            Signal::Hold
        };

        let (stop_loss, take_profit) = match (signal, entry_high, atr) {
            (Signal::Buy, Some(eh), Some(a)) => (
                Some(eh - params.atr_multiplier * a),
                Some(eh + params.atr_multiplier * a),
            ),
            _ => (None, None),
        };

        rows.push(IndicatorRow {
            bar: bar.clone(),
            true_range,
            atr,
            entry_high,
            exit_low,
            signal,
            stop_loss,
            take_profit,
        });

        high_window.push(bar.high);
        low_window.push(bar.low);
        prev_close = bar.close.is_finite().then_some(bar.close);
    }

    rows
}
