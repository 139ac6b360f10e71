//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to dataset validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to request or parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mismatch between an assembled feature row and what a fitted artifact expects
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Error loading or interpreting a pretrained artifact file
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Error raised while producing a prediction
    #[error("Prediction error: {0}")]
    PredictionError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error deserializing an artifact document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
