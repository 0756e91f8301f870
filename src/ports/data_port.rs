//! Historical bar access port trait.
//!
//! Market-data retrieval, merge/dedup and scheduling live behind this
//! boundary; the engine only ever sees an ordered, finite bar sequence.

use crate::domain::error::TurtleError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `ticker` within `[start_date, end_date]`, ascending by date,
    /// one bar per date.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TurtleError>;

    fn list_tickers(&self) -> Result<Vec<String>, TurtleError>;

    /// First date, last date and bar count, or `None` when no data exists.
    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TurtleError>;
}
