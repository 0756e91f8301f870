//! Optimized-parameter store port trait.
//!
//! The optimizer writes one row per asset; backtest and forward evaluation
//! read them back. A missing asset is an explicit `None`, never a silently
//! fabricated default.

use crate::domain::error::TurtleError;
use crate::domain::params::StoredParams;

pub trait ParamsPort {
    fn load_all(&self) -> Result<Vec<StoredParams>, TurtleError>;

    fn load(&self, asset: &str) -> Result<Option<StoredParams>, TurtleError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|p| p.asset.eq_ignore_ascii_case(asset)))
    }

    fn store_all(&self, params: &[StoredParams]) -> Result<(), TurtleError>;
}
