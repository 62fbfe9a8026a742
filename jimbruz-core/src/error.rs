//! Error types for the Jimbruz core library.

use thiserror::Error;

/// Top-level error type for core operations.
///
/// Only construction-time failures (bad config, unwritable data directory)
/// ever reach a caller of [`crate::Pet`]; runtime storage failures are logged
/// and swallowed there.
#[derive(Error, Debug)]
pub enum JimbruzError {
    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, JimbruzError>;
