//! Ticker universe parsing and validation.
//!
//! One bad ticker never aborts a run: validation collects warnings and the
//! survivors, and only errors when nothing is left to evaluate.

use crate::domain::error::TurtleError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Parse a comma-separated ticker list: trimmed, uppercased, no empties or
/// duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

pub struct UniverseValidation {
    pub tickers: Vec<String>,
    pub skipped: Vec<SkippedTicker>,
}

/// Check each ticker has at least `min_bars` bars in the window, warning and
/// skipping the ones that do not. Errs only when every ticker was skipped.
pub fn validate_universe(
    data_port: &dyn DataPort,
    tickers: Vec<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_bars: usize,
) -> Result<UniverseValidation, TurtleError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();

    for ticker in tickers {
        let bars = match data_port.fetch_ohlcv(&ticker, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipping {} ({})", ticker, e);
                skipped.push(SkippedTicker {
                    ticker,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if bars.len() < min_bars {
            eprintln!(
                "warning: skipping {} ({} bars, minimum {} required)",
                ticker,
                bars.len(),
                min_bars
            );
            skipped.push(SkippedTicker {
                reason: format!("{} bars, minimum {}", bars.len(), min_bars),
                ticker,
            });
            continue;
        }

        eprintln!("  {}: {} bars [OK]", ticker, bars.len());
        valid.push(ticker);
    }

    if valid.is_empty() {
        return Err(TurtleError::InsufficientData {
            ticker: "all".into(),
            bars: 0,
            minimum: min_bars,
        });
    }

    Ok(UniverseValidation {
        tickers: valid,
        skipped,
    })
}
