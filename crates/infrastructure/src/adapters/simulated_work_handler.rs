//! Placeholder job handler that simulates a fixed amount of work

use std::time::Duration;

use application::{error::ApplicationError, ports::JobHandler};
use async_trait::async_trait;
use domain::Job;
use tracing::trace;

/// Default simulated cost of one job
pub const DEFAULT_WORK_COST: Duration = Duration::from_millis(100);

/// [`JobHandler`] that sleeps for a fixed cost and always succeeds
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWorkHandler {
    cost: Duration,
}

impl Default for SimulatedWorkHandler {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_COST)
    }
}

impl SimulatedWorkHandler {
    /// Create a handler that takes `cost` per job
    pub const fn new(cost: Duration) -> Self {
        Self { cost }
    }

    /// Simulated cost of one job
    pub const fn cost(&self) -> Duration {
        self.cost
    }
}

#[async_trait]
impl JobHandler for SimulatedWorkHandler {
    async fn handle(&self, job: &Job) -> Result<(), ApplicationError> {
        trace!(
            job_data = %job,
            cost_ms = u64::try_from(self.cost.as_millis()).unwrap_or(u64::MAX),
            "Simulating work"
        );
        if !self.cost.is_zero() {
            tokio::time::sleep(self.cost).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cost_is_100ms() {
        assert_eq!(SimulatedWorkHandler::default().cost(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn takes_the_configured_cost() {
        let handler = SimulatedWorkHandler::new(Duration::from_millis(250));
        let start = tokio::time::Instant::now();

        handler.handle(&Job::new("payload")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn zero_cost_returns_immediately() {
        let handler = SimulatedWorkHandler::new(Duration::ZERO);
        let result =
            tokio::time::timeout(Duration::from_millis(50), handler.handle(&Job::new("x"))).await;
        assert!(matches!(result, Ok(Ok(()))));
    }
}
