//! Error types for progress tracking

use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by progress operations
///
/// Every variant reaches the caller unchanged; nothing in the core retries
/// or swallows an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressError {
    #[error("No progress found for user {0}")]
    NotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Progress changed concurrently (expected version {expected}, found {actual})")]
    ConcurrencyConflict { expected: i64, actual: i64 },
}

impl ProgressError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        ProgressError::Validation(message.into())
    }
}

/// Result alias for progress operations
pub type ProgressResult<T> = Result<T, ProgressError>;
