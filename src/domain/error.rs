//! Domain error types.

/// Top-level error type for volguard.
#[derive(Debug, thiserror::Error)]
pub enum VolguardError {
    #[error("shape mismatch between weights and returns: {reason}")]
    ShapeMismatch { reason: String },

    #[error("invalid risk config {field}: {reason}")]
    InvalidRiskConfig { field: String, reason: String },

    #[error("invalid frame: {reason}")]
    InvalidFrame { reason: String },

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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&VolguardError> for std::process::ExitCode {
    fn from(err: &VolguardError) -> Self {
        let code: u8 = match err {
            VolguardError::Io(_) => 1,
            VolguardError::ConfigParse { .. }
            | VolguardError::ConfigMissing { .. }
            | VolguardError::ConfigInvalid { .. }
            | VolguardError::InvalidRiskConfig { .. } => 2,
            VolguardError::Data { .. } | VolguardError::InvalidFrame { .. } => 3,
            VolguardError::ShapeMismatch { .. } => 4,
            VolguardError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
