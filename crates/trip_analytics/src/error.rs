use thiserror::Error;
use trip_core::SelectionError;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("no trips to export")]
    EmptyExport,
    #[error("trip '{0}' not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
