//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// Latency must be a finite, non-negative number of seconds
    #[error("Invalid latency: {0}")]
    InvalidLatency(String),

    /// Error rate must be a probability between 0 and 1
    #[error("Invalid error rate: {0} (must be between 0 and 1)")]
    InvalidErrorRate(f64),
}

impl DomainError {
    /// Create an invalid latency error
    pub fn invalid_latency(reason: impl Into<String>) -> Self {
        Self::InvalidLatency(reason.into())
    }
}
