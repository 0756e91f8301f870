//! CSV bar-file data adapter.
//!
//! Reads the `<TICKER>_data.csv` files the downloader collaborator produces:
//! header `timestamp,High,Low,Open,Close,Volume`, dates as `YYYY-MM-DD`.
//! Columns are located by header name, so column order does not matter.
//! Rows with unparsable or non-finite numerics are dropped, duplicate dates
//! keep their first occurrence, and output is sorted ascending.

use crate::domain::error::TurtleError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const FILE_SUFFIX: &str = "_data.csv";

pub struct CsvDataAdapter {
    folder: PathBuf,
}

struct Columns {
    timestamp: usize,
    high: usize,
    low: usize,
    open: usize,
    close: usize,
    volume: usize,
}

impl CsvDataAdapter {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.folder.join(format!("{}{}", ticker, FILE_SUFFIX))
    }

    fn locate_columns(headers: &csv::StringRecord, path: &str) -> Result<Columns, TurtleError> {
        let find = |name: &str| -> Result<usize, TurtleError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| TurtleError::Data {
                    reason: format!("{}: missing column '{}'", path, name),
                })
        };
        Ok(Columns {
            timestamp: find("timestamp")?,
            high: find("High")?,
            low: find("Low")?,
            open: find("Open")?,
            close: find("Close")?,
            volume: find("Volume")?,
        })
    }

    fn parse_field(record: &csv::StringRecord, index: usize) -> Option<f64> {
        record
            .get(index)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, TurtleError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(TurtleError::NoData {
                ticker: ticker.to_string(),
            });
        }
        let display = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| TurtleError::Data {
            reason: format!("failed to read {}: {}", display, e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let columns = Self::locate_columns(
            rdr.headers().map_err(|e| TurtleError::Data {
                reason: format!("{}: {}", display, e),
            })?,
            &display,
        )?;

        let mut bars: Vec<OhlcvBar> = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| TurtleError::Data {
                reason: format!("{}: {}", display, e),
            })?;

            let Some(date_str) = record.get(columns.timestamp) else {
                dropped += 1;
                continue;
            };
            // downloader sometimes emits full timestamps; keep the date part
            let date_str = date_str.trim();
            let date_part = date_str.split(|c| c == 'T' || c == ' ').next().unwrap_or(date_str);
            let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
                dropped += 1;
                continue;
            };

            let fields = (
                Self::parse_field(&record, columns.open),
                Self::parse_field(&record, columns.high),
                Self::parse_field(&record, columns.low),
                Self::parse_field(&record, columns.close),
                Self::parse_field(&record, columns.volume),
            );
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
                dropped += 1;
                continue;
            };

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        if dropped > 0 {
            eprintln!("warning: {}: dropped {} malformed rows", display, dropped);
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TurtleError> {
        let entries = fs::read_dir(&self.folder).map_err(|e| TurtleError::Data {
            reason: format!("failed to read directory {}: {}", self.folder.display(), e),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TurtleError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(FILE_SUFFIX) {
                if !ticker.is_empty() {
                    tickers.push(ticker.to_string());
                }
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TurtleError> {
        let bars = match self.fetch_ohlcv(ticker, NaiveDate::MIN, NaiveDate::MAX) {
            Ok(bars) => bars,
            Err(TurtleError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
