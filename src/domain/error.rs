//! Domain error types.

/// Top-level error type for turtlebt.
///
/// Insufficient indicator history and zero-volatility bars are deliberately
/// not represented here: they yield undefined indicator fields and skipped
/// entries, not errors. Errors below are for missing or malformed external
/// inputs (config, data files, parameter store).
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("no optimized parameters stored for {asset}")]
    NoParams { asset: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TurtleError {
    pub fn exit_code(&self) -> u8 {
        match self {
            TurtleError::Io(_) => 1,
            TurtleError::ConfigParse { .. }
            | TurtleError::ConfigMissing { .. }
            | TurtleError::ConfigInvalid { .. } => 2,
            TurtleError::Data { .. } => 3,
            TurtleError::NoParams { .. } => 4,
            TurtleError::NoData { .. } | TurtleError::InsufficientData { .. } => 5,
        }
    }
}

impl From<&TurtleError> for std::process::ExitCode {
    fn from(err: &TurtleError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
