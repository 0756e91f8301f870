//! Bar-by-bar trade simulation.
//!
//! Replays an indicator row sequence through the Flat/Long state machine and
//! produces an append-only trade log plus the realized profit total.

use crate::domain::indicator::{IndicatorRow, Signal};
use crate::domain::position::{OpenPosition, PositionState};
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "Buy"),
            TradeAction::Sell => write!(f, "Sell"),
        }
    }
}

/// One entry in the trade log. `stop_loss` is carried on Buy records,
/// `profit` on Sell records.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub size: f64,
    pub stop_loss: Option<f64>,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trades: Vec<Trade>,
    pub total_profit: f64,
    /// A position still open after the last bar. Its unrealized value is not
    /// part of `total_profit`.
    pub open_position: Option<OpenPosition>,
}

impl SimulationResult {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

/// Per-asset aggregate handed to the reporting layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResult {
    pub asset: String,
    pub total_profit: f64,
    pub trade_count: usize,
}

/// Replay `rows` in order with one long position at most.
///
/// Entry requires a Buy signal, a defined stop and a defined, strictly
/// positive ATR (the position size divides by it). Position size is
/// `risk_per_trade * account_balance / atr`, always against the initial
/// balance; profits are not compounded into sizing. Exit fires when the
/// close is at or below the locked stop or the row signals Sell, at the
/// closing price.
pub fn simulate(rows: &[IndicatorRow], account_balance: f64, risk_per_trade: f64) -> SimulationResult {
    let mut state = PositionState::Flat;
    let mut trades = Vec::new();
    let mut total_profit = 0.0;

    for row in rows {
        match &state {
            PositionState::Flat => {
                if row.signal != Signal::Buy {
                    continue;
                }
                let Some(atr) = row.atr.filter(|a| *a > 0.0) else {
                    // degenerate volatility: entry skipped, not an error
                    continue;
                };
                let Some(stop_loss) = row.stop_loss else {
                    continue;
                };
                let size = risk_per_trade * account_balance / atr;
                let entry_price = row.bar.close;
                trades.push(Trade {
                    date: row.bar.date,
                    action: TradeAction::Buy,
                    price: entry_price,
                    size,
                    stop_loss: Some(stop_loss),
                    profit: None,
                });
                state = PositionState::Long(OpenPosition {
                    entry_price,
                    entry_date: row.bar.date,
                    stop_loss,
                    size,
                });
            }
            PositionState::Long(pos) => {
                if pos.stop_hit(row.bar.close) || row.signal == Signal::Sell {
                    let profit = pos.unrealized_profit(row.bar.close);
                    total_profit += profit;
                    trades.push(Trade {
                        date: row.bar.date,
                        action: TradeAction::Sell,
                        price: row.bar.close,
                        size: pos.size,
                        stop_loss: None,
                        profit: Some(profit),
                    });
                    state = PositionState::Flat;
                }
            }
        }
    }

    let open_position = match state {
        PositionState::Long(pos) => Some(pos),
        PositionState::Flat => None,
    };

    SimulationResult {
        trades,
        total_profit,
        open_position,
    }
}
