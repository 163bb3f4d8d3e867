//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod in_memory_job_queue;
mod prometheus_metrics;
mod redis_job_queue;
mod simulated_work_handler;

pub use in_memory_job_queue::InMemoryJobQueue;
pub use prometheus_metrics::{
    INJECTED_FAULTS_TOTAL, JOBS_FAILED_TOTAL, JOBS_PROCESSED_TOTAL, PrometheusMetrics,
    THROUGHPUT_JOBS_PER_SECOND,
};
pub use redis_job_queue::{RedisJobQueue, RedisQueueError};
pub use simulated_work_handler::{DEFAULT_WORK_COST, SimulatedWorkHandler};
