//! Position state machine types.
//!
//! The simulator holds exactly one logical position per asset, modeled as an
//! explicit two-state enum rather than loose mutable flags so the
//! single-position invariant is visible in the types.

use chrono::NaiveDate;

/// A long position as locked in at entry. None of these fields are ever
/// recomputed while the position is open.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub stop_loss: f64,
    pub size: f64,
}

impl OpenPosition {
    pub fn stop_hit(&self, close: f64) -> bool {
        close <= self.stop_loss
    }

    pub fn unrealized_profit(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.size
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long(OpenPosition),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, PositionState::Long(_))
    }
}
