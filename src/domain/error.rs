//! Domain error types.

/// Top-level error type for quantdash.
#[derive(Debug, thiserror::Error)]
pub enum QuantdashError {
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

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantdashError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        QuantdashError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantdashError> for std::process::ExitCode {
    fn from(err: &QuantdashError) -> Self {
        let code: u8 = match err {
            QuantdashError::Io(_) | QuantdashError::Report { .. } | QuantdashError::Json(_) => 1,
            QuantdashError::ConfigParse { .. }
            | QuantdashError::ConfigMissing { .. }
            | QuantdashError::ConfigInvalid { .. } => 2,
            QuantdashError::Data { .. } => 3,
            QuantdashError::InvalidParameter { .. } => 4,
            QuantdashError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
