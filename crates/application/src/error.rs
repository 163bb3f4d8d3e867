//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Queue transport error (connection lost, command rejected, ...)
    #[error("Queue error: {0}")]
    Queue(String),

    /// The unit of work failed for a job
    #[error("Job processing failed: {0}")]
    Processing(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplicationError::Queue(_))
    }
}
