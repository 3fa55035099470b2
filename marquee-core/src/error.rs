//! Error types for marquee-core

use thiserror::Error;

/// Main error type for the marquee-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Rating outside the 1-5 scale
    #[error("invalid rating {0}: must be between 1 and 5")]
    InvalidRating(u8),

    /// Record rejected before it reached the store
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Record not found
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for marquee-core
pub type Result<T> = std::result::Result<T, Error>;
