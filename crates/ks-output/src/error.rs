//! Error types for ks-output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when writing trial logs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("trial directory {0} already exists (set overwrite to replace it)")]
    TrialExists(PathBuf),

    #[error("aggregator `{0}` is already registered")]
    DuplicateAggregator(String),

    #[error("invalid aggregator name `{0}`")]
    InvalidName(String),

    #[error("logger already finished")]
    Finished,
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
