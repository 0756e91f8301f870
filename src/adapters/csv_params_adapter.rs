//! CSV optimized-parameter store adapter.
//!
//! One row per asset: `asset,breakout_high_period,breakout_low_period,
//! atr_multiplier,profit`. Written by the optimize run, read back by
//! backtest and forward runs.

use crate::domain::error::TurtleError;
use crate::domain::params::StoredParams;
use crate::ports::params_port::ParamsPort;
use std::fs;
use std::path::PathBuf;

pub struct CsvParamsAdapter {
    path: PathBuf,
}

impl CsvParamsAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Result<StoredParams, TurtleError> {
        let field = |index: usize, name: &str| -> Result<&str, TurtleError> {
            record.get(index).ok_or_else(|| TurtleError::Data {
                reason: format!("{}: missing column '{}'", self.path.display(), name),
            })
        };
        let bad = |name: &str, value: &str| TurtleError::Data {
            reason: format!(
                "{}: invalid {} '{}'",
                self.path.display(),
                name,
                value
            ),
        };

        let asset = field(0, "asset")?.trim().to_string();
        let high_str = field(1, "breakout_high_period")?.trim();
        let low_str = field(2, "breakout_low_period")?.trim();
        let mult_str = field(3, "atr_multiplier")?.trim();
        let profit_str = field(4, "profit")?.trim();

        Ok(StoredParams {
            asset,
            breakout_high_period: high_str
                .parse()
                .map_err(|_| bad("breakout_high_period", high_str))?,
            breakout_low_period: low_str
                .parse()
                .map_err(|_| bad("breakout_low_period", low_str))?,
            atr_multiplier: mult_str
                .parse()
                .map_err(|_| bad("atr_multiplier", mult_str))?,
            profit: profit_str.parse().map_err(|_| bad("profit", profit_str))?,
        })
    }
}

impl ParamsPort for CsvParamsAdapter {
    fn load_all(&self) -> Result<Vec<StoredParams>, TurtleError> {
        if !self.path.exists() {
            return Err(TurtleError::Data {
                reason: format!(
                    "optimized parameters file not found: {}",
                    self.path.display()
                ),
            });
        }
        let content = fs::read_to_string(&self.path).map_err(|e| TurtleError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut params = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TurtleError::Data {
                reason: format!("{}: {}", self.path.display(), e),
            })?;
            params.push(self.parse_row(&record)?);
        }
        Ok(params)
    }

    fn store_all(&self, params: &[StoredParams]) -> Result<(), TurtleError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "asset",
            "breakout_high_period",
            "breakout_low_period",
            "atr_multiplier",
            "profit",
        ])
        .map_err(|e| TurtleError::Data {
            reason: format!("csv write error: {}", e),
        })?;
        for p in params {
            wtr.write_record([
                p.asset.clone(),
                p.breakout_high_period.to_string(),
                p.breakout_low_period.to_string(),
                p.atr_multiplier.to_string(),
                format!("{:.2}", p.profit),
            ])
            .map_err(|e| TurtleError::Data {
                reason: format!("csv write error: {}", e),
            })?;
        }
        let bytes = wtr.into_inner().map_err(|e| TurtleError::Data {
            reason: format!("csv write error: {}", e),
        })?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
