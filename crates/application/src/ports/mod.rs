//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod job_handler;
mod job_queue_port;
mod metrics_port;

#[cfg(test)]
pub use job_handler::MockJobHandler;
pub use job_handler::JobHandler;
#[cfg(test)]
pub use job_queue_port::MockJobQueuePort;
pub use job_queue_port::JobQueuePort;
#[cfg(test)]
pub use metrics_port::MockMetricsPort;
pub use metrics_port::{FaultKind, MetricsPort};
