//! Application services

mod backoff;
mod job_consumer;
mod throughput;

pub use backoff::BackoffSettings;
pub use job_consumer::{
    BatchReport, ConsumerSettings, DEFAULT_BATCH_SIZE, DEFAULT_PROCESSED_QUEUE, DEFAULT_SOURCE_QUEUE,
    DrainStop, JobConsumer, QueueNames,
};
pub use throughput::{DEFAULT_THROUGHPUT_WINDOW, ThroughputCounter, ThroughputSampler};
