//! Error types for subject-lock.
//!
//! Uses thiserror for derive macros. Acquisition has exactly one failure
//! kind, [`LockError::NotAcquired`]; the other variants belong to the
//! configuration and diagnostics surfaces.

use thiserror::Error;

/// Main error type for lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The backend could not establish the requested lock.
    #[error("Lock not acquired: {0}")]
    NotAcquired(String),

    /// Configuration could not be read, parsed or validated.
    #[error("Invalid lock configuration: {0}")]
    Config(String),

    /// Holder metadata in a lock file could not be read or parsed.
    #[error("Invalid lock metadata: {0}")]
    Metadata(String),
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
