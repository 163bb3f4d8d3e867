//! Job handler port
//!
//! The unit of work the consumer invokes for every popped job. The consumer
//! only cares about draining and accounting; what a job actually does is
//! supplied through this port.

use async_trait::async_trait;
use domain::Job;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for processing a single job
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Process one job
    async fn handle(&self, job: &Job) -> Result<(), ApplicationError>;
}
