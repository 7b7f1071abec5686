//! Error types for adlens-core

use thiserror::Error;

/// Main error type for the adlens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A filter condition or cell referenced a name that is not an ad field
    #[error("unknown ad field: {0}")]
    UnknownField(String),

    /// A metric id that the registry does not know
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Malformed filter input (e.g. an unknown status selector)
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Spend range with min > max or non-finite bounds
    #[error("invalid spend range [{min}, {max}]")]
    InvalidSpendRange { min: f64, max: f64 },

    /// An ad record violating the data model invariants
    #[error("invalid ad record {id}: {message}")]
    InvalidRecord { id: String, message: String },

    /// A selection payload that does not describe exactly one variant
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Account not known to the data provider
    #[error("account not found: {0}")]
    AccountNotFound(String),
}

/// Result type alias for adlens-core
pub type Result<T> = std::result::Result<T, Error>;
