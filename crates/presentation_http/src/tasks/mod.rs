//! Background tasks for the HTTP presentation layer

mod job_consumer;
mod throughput_sampler;

pub use job_consumer::spawn_job_consumer;
pub use throughput_sampler::spawn_throughput_sampler;
