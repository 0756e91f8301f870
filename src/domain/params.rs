//! Strategy parameters and the optimization grid.

pub const DEFAULT_ATR_PERIOD: usize = 20;
pub const DEFAULT_RISK_PER_TRADE: f64 = 0.01;

/// One immutable parameter set for a signal/simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleParams {
    pub breakout_high_period: usize,
    pub breakout_low_period: usize,
    pub atr_period: usize,
    pub atr_multiplier: f64,
}

impl TurtleParams {
    /// Bars needed before every indicator field can be defined. The ATR needs
    /// `atr_period` true ranges, the first of which appears at index 1; the
    /// breakout channels need their full window plus the one-bar shift.
    pub fn min_history(&self) -> usize {
        let atr = self.atr_period + 1;
        let high = self.breakout_high_period + 1;
        let low = self.breakout_low_period + 1;
        atr.max(high).max(low)
    }
}

/// Capital and risk settings shared by every evaluation, read from config
/// rather than hard-coded so the engine is reusable across assets and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub atr_period: usize,
    pub risk_per_trade: f64,
    pub initial_balance: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            atr_period: DEFAULT_ATR_PERIOD,
            risk_per_trade: DEFAULT_RISK_PER_TRADE,
            initial_balance: 100_000.0,
        }
    }
}

/// Candidate values for the optimizer's exhaustive search. The ATR period is
/// held fixed and supplied separately.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub breakout_high_periods: Vec<usize>,
    pub breakout_low_periods: Vec<usize>,
    pub atr_multipliers: Vec<f64>,
}

impl Default for ParamGrid {
    /// The classic System 1 / System 2 grid.
    fn default() -> Self {
        ParamGrid {
            breakout_high_periods: vec![20, 55],
            breakout_low_periods: vec![10, 20],
            atr_multipliers: vec![2.0, 3.0],
        }
    }
}

impl ParamGrid {
    pub fn len(&self) -> usize {
        self.breakout_high_periods.len()
            * self.breakout_low_periods.len()
            * self.atr_multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cartesian product in a fixed nesting order (high period, then low
    /// period, then multiplier). The optimizer's first-wins tie-break makes
    /// this order part of the observable contract.
    pub fn combinations(&self, atr_period: usize) -> Vec<TurtleParams> {
        let mut out = Vec::with_capacity(self.len());
        for &high in &self.breakout_high_periods {
            for &low in &self.breakout_low_periods {
                for &mult in &self.atr_multipliers {
                    out.push(TurtleParams {
                        breakout_high_period: high,
                        breakout_low_period: low,
                        atr_period,
                        atr_multiplier: mult,
                    });
                }
            }
        }
        out
    }
}

/// A parameter set as persisted per asset by the optimizer. The ATR period is
/// not stored; callers re-attach the configured one.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredParams {
    pub asset: String,
    pub breakout_high_period: usize,
    pub breakout_low_period: usize,
    pub atr_multiplier: f64,
    pub profit: f64,
}

impl StoredParams {
    pub fn to_params(&self, atr_period: usize) -> TurtleParams {
        TurtleParams {
            breakout_high_period: self.breakout_high_period,
            breakout_low_period: self.breakout_low_period,
            atr_period,
            atr_multiplier: self.atr_multiplier,
        }
    }
}
