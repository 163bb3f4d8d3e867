//! Job queue port definition
//!
//! Defines the FIFO queue the consumer drains and the downstream list it
//! forwards processed payloads to. Implementations may be backed by Redis
//! lists or by an in-process queue.

use async_trait::async_trait;
use domain::Job;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for blocking and non-blocking queue access
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobQueuePort: Send + Sync {
    /// Wait until a job is available on `queue` and pop it
    ///
    /// Suspends only the calling task. Returns `Ok(None)` once the backend is
    /// closed and will never yield another job.
    async fn pop_blocking(&self, queue: &str) -> Result<Option<Job>, ApplicationError>;

    /// Pop a job if one is available right now
    ///
    /// Returns `Ok(None)` when the queue is empty. Transport failures are
    /// reported as errors and must not be confused with emptiness.
    async fn try_pop(&self, queue: &str) -> Result<Option<Job>, ApplicationError>;

    /// Push a job onto `queue`
    async fn push(&self, queue: &str, job: &Job) -> Result<(), ApplicationError>;
}
