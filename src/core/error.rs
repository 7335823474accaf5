//! Error types for tally

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using tally's Error
pub type Result<T> = std::result::Result<T, Error>;

/// tally error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Ledger not found: {path}")]
    LedgerNotFound { path: PathBuf },

    #[error("Ledger error: {message}")]
    LedgerError { message: String },

    #[error("Query error: {message}")]
    QueryError { message: String },

    #[error("Evaluation error: {message}")]
    EvalError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
