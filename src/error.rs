//! Error types for the preprocessing pipeline and the analytics engine.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure while reading the raw dataset. Aborts a preprocessing run
/// before anything is persisted.
#[derive(Error, Debug)]
pub enum IngestError {
    /// No file exists at the given source location.
    #[error("raw dataset not found at {0}")]
    NotFound(String),

    /// The source exists but could not be read or decoded.
    #[error("failed to read raw dataset {source_name}: {reason}")]
    Unreadable { source_name: String, reason: String },

    /// The header row lacks a column the cleaner depends on.
    #[error("raw dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Failure reading or writing the canonical store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("canonical dataset not found at {}. Run preprocessing first", .0.display())]
    NotFound(PathBuf),

    #[error("canonical store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("canonical store is malformed: {0}")]
    Csv(#[from] csv::Error),
}

/// Any failure that aborts a preprocessing run.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Malformed parameters reaching the analytics engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(usize),
}
