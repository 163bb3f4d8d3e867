//! Throughput sampling task

use application::ThroughputSampler;
use tracing::info;

/// Spawn the sampler that publishes the throughput gauge once per window
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
pub fn spawn_throughput_sampler(sampler: ThroughputSampler) -> tokio::task::JoinHandle<()> {
    info!(
        window_ms = u64::try_from(sampler.window().as_millis()).unwrap_or(u64::MAX),
        "Starting throughput sampler"
    );

    tokio::spawn(sampler.run())
}
