//! Metrics sink port
//!
//! Counter and gauge events emitted by the consumer, the throughput sampler
//! and the fault injection middleware.

#[cfg(test)]
use mockall::automock;

/// Kind of fault injected into a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The request was delayed
    Latency,
    /// The request was short-circuited with an error
    Error,
}

impl FaultKind {
    /// Label value used when exporting the fault kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Error => "error",
        }
    }
}

/// Port for recording metrics
#[cfg_attr(test, automock)]
pub trait MetricsPort: Send + Sync {
    /// Increment the total processed jobs counter by one
    fn record_job_processed(&self);

    /// Increment the failed jobs counter by one
    fn record_job_failed(&self);

    /// Set the jobs-per-second gauge for the last accounting window
    fn set_throughput(&self, jobs_per_second: u64);

    /// Increment the injected faults counter for `kind`
    fn record_fault_injected(&self, kind: FaultKind);
}
