//! Queue consumer task
//!
//! Runs the batch consumer beside the HTTP server for the process lifetime.

use application::JobConsumer;

/// Spawn the batch consumer
///
/// The task ends only if the queue is closed. Returns a `JoinHandle` that
/// can be used to abort the task when shutting down.
pub fn spawn_job_consumer(consumer: JobConsumer) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { consumer.run().await })
}
