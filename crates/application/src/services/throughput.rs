//! Throughput accounting
//!
//! The consumer records every processed job into a [`ThroughputCounter`];
//! a [`ThroughputSampler`] publishes and resets the count once per window.
//! The counter is a single atomic so the read-and-reset never races with an
//! increment.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::trace;

use crate::ports::MetricsPort;

/// Default accounting window: one second
pub const DEFAULT_THROUGHPUT_WINDOW: Duration = Duration::from_secs(1);

/// Jobs processed within the current accounting window
#[derive(Debug, Default)]
pub struct ThroughputCounter {
    count: AtomicU64,
}

impl ThroughputCounter {
    /// Create a counter starting at zero
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
        }
    }

    /// Record one processed job
    pub fn record(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count without resetting it
    #[must_use]
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Return the accumulated count and reset it to zero in one step
    pub fn take(&self) -> u64 {
        self.count.swap(0, Ordering::AcqRel)
    }
}

/// Publishes the throughput counter to the metrics sink once per window
#[derive(Clone)]
pub struct ThroughputSampler {
    counter: Arc<ThroughputCounter>,
    metrics: Arc<dyn MetricsPort>,
    window: Duration,
}

impl std::fmt::Debug for ThroughputSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThroughputSampler")
            .field("counter", &self.counter)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl ThroughputSampler {
    /// Create a sampler with the default one-second window
    pub fn new(counter: Arc<ThroughputCounter>, metrics: Arc<dyn MetricsPort>) -> Self {
        Self {
            counter,
            metrics,
            window: DEFAULT_THROUGHPUT_WINDOW,
        }
    }

    /// Override the accounting window
    #[must_use]
    pub const fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Length of one accounting window
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Publish the count of the window that just ended and start a new one
    ///
    /// Publishes zero when nothing was processed. Returns the published value.
    pub fn sample(&self) -> u64 {
        let processed = self.counter.take();
        self.metrics.set_throughput(processed);
        trace!(jobs_per_window = processed, "Published throughput sample");
        processed
    }

    /// Sample once per window, forever
    ///
    /// The first sample is taken one full window after the call.
    pub async fn run(self) {
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + self.window, self.window);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.sample();
        }
    }
}
