use std::path::PathBuf;

use thiserror::Error;

/// Input validation errors exposed by `stogra-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("symbol list must contain at least one valid symbol")]
    EmptySymbolList,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unix timestamp {value} is out of range")]
    TimestampOutOfRange { value: i64 },

    #[error("search query must be between {min} and {max} characters, got {len}")]
    QueryLength { len: usize, min: usize, max: usize },
    #[error("limit must be between {min} and {max}, got {value}")]
    LimitOutOfRange { value: usize, min: usize, max: usize },
}

/// Errors returned by the public read operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("ticker '{symbol}' not found")]
    NotFound { symbol: String },
}

/// Errors raised while loading configuration tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse market universe: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid market universe: {0}")]
    Invalid(String),
}
