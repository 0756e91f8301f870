//! Exhaustive parameter search over a training window.

use crate::domain::indicator;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::params::{ParamGrid, TurtleParams};
use crate::domain::simulator;

/// The winning parameter set for one asset's training window.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub asset: String,
    pub params: TurtleParams,
    pub total_profit: f64,
    pub trade_count: usize,
}

/// Evaluate every candidate tuple in `grid` over `bars` and keep the most
/// profitable.
///
/// The search is a plain exhaustive scan in the grid's fixed enumeration
/// order, compared with strict greater-than, so the first-seen tuple wins
/// ties and identical inputs always produce the identical result. No pruning
/// and no early exit; the grid is tens of combinations at most.
///
/// Returns `None` only for an empty grid.
pub fn optimize(
    asset: &str,
    bars: &[OhlcvBar],
    grid: &ParamGrid,
    atr_period: usize,
    account_balance: f64,
    risk_per_trade: f64,
) -> Option<OptimizationResult> {
    let mut best: Option<OptimizationResult> = None;

    for params in grid.combinations(atr_period) {
        let rows = indicator::compute(bars, &params);
        let sim = simulator::simulate(&rows, account_balance, risk_per_trade);

        let better = match &best {
            None => true,
            Some(b) => sim.total_profit > b.total_profit,
        };
        if better {
            best = Some(OptimizationResult {
                asset: asset.to_string(),
                params,
                total_profit: sim.total_profit,
                trade_count: sim.trade_count(),
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            ticker: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(day as u64),
            open: close,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    /// A slow up-trend with periodic shakeouts, enough history for every
    /// candidate window.
    fn trending_bars(n: usize) -> Vec<OhlcvBar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                let dip = if i % 13 == 0 { 6.0 } else { 0.0 };
                make_bar(i as u32, base + 2.0, base - 2.0 - dip, base - dip)
            })
            .collect()
    }

    fn small_grid() -> ParamGrid {
        ParamGrid {
            breakout_high_periods: vec![3, 5],
            breakout_low_periods: vec![3, 4],
            atr_multipliers: vec![2.0, 3.0],
        }
    }

    #[test]
    fn empty_grid_yields_none() {
        let grid = ParamGrid {
            breakout_high_periods: vec![],
            breakout_low_periods: vec![3],
            atr_multipliers: vec![2.0],
        };
        assert!(optimize("TEST", &trending_bars(60), &grid, 5, 100_000.0, 0.01).is_none());
    }

    #[test]
    fn best_beats_every_candidate() {
        let bars = trending_bars(80);
        let grid = small_grid();
        let best = optimize("TEST", &bars, &grid, 5, 100_000.0, 0.01).unwrap();

        for params in grid.combinations(5) {
            let rows = indicator::compute(&bars, &params);
            let sim = simulator::simulate(&rows, 100_000.0, 0.01);
            assert!(
                best.total_profit >= sim.total_profit,
                "candidate {:?} beat the winner",
                params
            );
        }
    }

    #[test]
    fn idempotent_over_reruns() {
        let bars = trending_bars(80);
        let grid = small_grid();
        let a = optimize("TEST", &bars, &grid, 5, 100_000.0, 0.01).unwrap();
        let b = optimize("TEST", &bars, &grid, 5, 100_000.0, 0.01).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_candidate_wins_ties() {
        // A series that never breaks out produces zero profit for every
        // candidate; the winner must be the first enumerated tuple.
        let bars: Vec<OhlcvBar> = (0..40).map(|i| make_bar(i, 101.0, 99.0, 100.0)).collect();
        let grid = small_grid();
        let best = optimize("TEST", &bars, &grid, 5, 100_000.0, 0.01).unwrap();
        let first = &grid.combinations(5)[0];
        assert_eq!(&best.params, first);
        assert!((best.total_profit - 0.0).abs() < f64::EPSILON);
        assert_eq!(best.trade_count, 0);
    }

    #[test]
    fn result_carries_asset_and_counts() {
        let bars = trending_bars(80);
        let best = optimize("TSLA", &bars, &small_grid(), 5, 100_000.0, 0.01).unwrap();
        assert_eq!(best.asset, "TSLA");
        let rows = indicator::compute(&bars, &best.params);
        let sim = simulator::simulate(&rows, 100_000.0, 0.01);
        assert_eq!(best.trade_count, sim.trade_count());
        assert!((best.total_profit - sim.total_profit).abs() < 1e-9);
    }
}
