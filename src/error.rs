//! Error types for ID3 tree induction

use thiserror::Error;

/// Result type alias for ID3 operations
pub type Result<T> = std::result::Result<T, Id3Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Id3Error {
    #[error("Empty input: entropy and gain need at least one row")]
    EmptyInput,

    #[error("Target column not found: {0}")]
    NoTargetColumn(String),

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("No branch for {attribute} = '{value}'")]
    UnseenValue { attribute: String, value: String },

    #[error("Tree depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for Id3Error {
    fn from(err: polars::error::PolarsError) -> Self {
        Id3Error::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for Id3Error {
    fn from(err: serde_json::Error) -> Self {
        Id3Error::SerializationError(err.to_string())
    }
}
