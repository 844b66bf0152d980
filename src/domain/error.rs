//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for quantsim.
#[derive(Debug, thiserror::Error)]
pub enum QuantsimError {
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

    #[error("invalid run configuration: {reason}")]
    RunConfig { reason: String },

    #[error("signal for {symbol} on {date} outside {{0, 1}}: {value}")]
    SignalDomain {
        symbol: String,
        date: NaiveDate,
        value: i64,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantsimError> for std::process::ExitCode {
    fn from(err: &QuantsimError) -> Self {
        let code: u8 = match err {
            QuantsimError::Io(_) => 1,
            QuantsimError::ConfigParse { .. }
            | QuantsimError::ConfigMissing { .. }
            | QuantsimError::ConfigInvalid { .. }
            | QuantsimError::RunConfig { .. } => 2,
            QuantsimError::Data { .. } => 3,
            QuantsimError::SignalDomain { .. } => 4,
            QuantsimError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
