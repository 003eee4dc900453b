//! Error types for Court Finder Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Court Finder Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Request parameters are missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Location is not in the venue table
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Booking API or completion service failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::UnknownLocation(_) => 400,
            _ => 500,
        }
    }
}
