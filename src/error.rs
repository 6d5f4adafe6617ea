use crate::models::Axis;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid format: '{text}' is not a valid {expected} value")]
    InvalidFormat {
        text: String,
        expected: String,
        axis: Option<Axis>,
    },

    #[error("Malformed value: {message}")]
    MalformedValue {
        message: String,
        axis: Option<Axis>,
    },

    #[error("Unsupported notation index: {0}")]
    UnsupportedNotation(usize),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ConversionError {
    pub fn malformed(message: impl Into<String>, axis: Option<Axis>) -> Self {
        ConversionError::MalformedValue {
            message: message.into(),
            axis,
        }
    }

    /// Axis the error originated from, when it came from a single field
    pub fn axis(&self) -> Option<Axis> {
        match self {
            ConversionError::InvalidFormat { axis, .. }
            | ConversionError::MalformedValue { axis, .. } => *axis,
            _ => None,
        }
    }

    /// Per-row errors are reported and skipped, everything else aborts the run
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            ConversionError::InvalidFormat { .. } | ConversionError::MalformedValue { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::Io(_) => "Io",
            ConversionError::Csv(_) => "Csv",
            ConversionError::Configuration(_) => "ConfigurationError",
            ConversionError::Settings(_) => "SettingsError",
            ConversionError::Validation(_) => "ValidationError",
            ConversionError::InvalidFormat { .. } => "InvalidFormat",
            ConversionError::MalformedValue { .. } => "MalformedValue",
            ConversionError::UnsupportedNotation(_) => "UnsupportedNotation",
            ConversionError::Json(_) => "Json",
            ConversionError::TaskJoin(_) => "TaskJoin",
        }
    }
}
