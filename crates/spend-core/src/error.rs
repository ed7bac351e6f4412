use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the spend tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A month key was not of the form `YYYY-MM`.
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),

    /// A category label is not one of the known categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A date or timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// An expense record failed validation.
    #[error("Invalid expense {id}: {reason}")]
    InvalidExpense { id: String, reason: String },

    /// The expense data path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No JSON expense files were found under the given directory.
    #[error("No JSON files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the spend crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
