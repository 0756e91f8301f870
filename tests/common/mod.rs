#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use turtlebt::domain::error::TurtleError;
pub use turtlebt::domain::ohlcv::OhlcvBar;
use turtlebt::domain::params::TurtleParams;
use turtlebt::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TurtleError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(TurtleError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, TurtleError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TurtleError> {
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: date(2024, 1, 1) + chrono::Days::new(day as u64),
        open: close,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

pub fn small_params() -> TurtleParams {
    TurtleParams {
        breakout_high_period: 2,
        breakout_low_period: 2,
        atr_period: 2,
        atr_multiplier: 2.0,
    }
}

/// Flat channel around 100, a breakout bar at `breakout_close`, then a tail
/// of closes with a one-point range each.
pub fn breakout_series(ticker: &str, breakout_close: f64, tail_closes: &[f64]) -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = (0..4)
        .map(|i| make_bar(ticker, i, 102.0, 98.0, 100.0))
        .collect();
    bars.push(make_bar(ticker, 4, breakout_close, 98.0, breakout_close));
    for (i, &close) in tail_closes.iter().enumerate() {
        bars.push(make_bar(ticker, 5 + i as u32, close + 1.0, close - 1.0, close));
    }
    bars
}

/// Write `<TICKER>_data.csv` in the downloader's format.
pub fn write_data_csv(folder: &Path, ticker: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("timestamp,High,Low,Open,Close,Volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.high,
            bar.low,
            bar.open,
            bar.close,
            bar.volume
        ));
    }
    fs::write(folder.join(format!("{}_data.csv", ticker)), content).unwrap();
}
