//! Batch job consumer
//!
//! Moves work from the source queue into the job handler. The loop alternates
//! between two phases:
//!
//! - **Waiting**: a blocking pop suspends the consumer task until a job exists.
//! - **Draining**: after a successful blocking pop, up to `batch_size - 1`
//!   further non-blocking pops are attempted. Draining stops at the first
//!   empty reply, at the first transport error, or at the batch ceiling.
//!
//! Every popped job is either processed and forwarded to the processed queue
//! or logged as an error. A failing forward is logged and swallowed: the job
//! still counts as processed.

use std::sync::Arc;
use std::time::Instant;

use domain::Job;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{BackoffSettings, ThroughputCounter};
use crate::error::ApplicationError;
use crate::ports::{JobHandler, JobQueuePort, MetricsPort};

/// Default number of jobs handled per wake-up, including the blocking pop
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default source queue name
pub const DEFAULT_SOURCE_QUEUE: &str = "job-queue";

/// Default downstream queue name
pub const DEFAULT_PROCESSED_QUEUE: &str = "processed-jobs";

/// Names of the queues the consumer reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueNames {
    /// Queue jobs are popped from
    pub source: String,
    /// Queue processed payloads are pushed to
    pub processed: String,
}

impl Default for QueueNames {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_QUEUE.to_string(),
            processed: DEFAULT_PROCESSED_QUEUE.to_string(),
        }
    }
}

/// Consumer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerSettings {
    /// Maximum jobs per drain cycle, including the blocking pop (default: 10)
    pub batch_size: usize,
    /// Queue names
    pub queues: QueueNames,
    /// Backoff applied after a failing blocking pop
    pub backoff: BackoffSettings,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            queues: QueueNames::default(),
            backoff: BackoffSettings::default(),
        }
    }
}

impl ConsumerSettings {
    /// Set the batch ceiling
    ///
    /// Values below one are raised to one: the blocking pop is always part
    /// of the batch.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the queue names
    #[must_use]
    pub fn with_queues(mut self, queues: QueueNames) -> Self {
        self.queues = queues;
        self
    }

    /// Set the backoff for blocking pop failures
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffSettings) -> Self {
        self.backoff = backoff;
        self
    }
}

/// Why a drain cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStop {
    /// A non-blocking pop reported an empty queue
    Exhausted,
    /// The batch ceiling was reached
    Ceiling,
    /// A non-blocking pop failed
    TransportError,
}

/// Outcome of one waiting + draining cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Jobs handled successfully (and counted)
    pub processed: usize,
    /// Jobs whose handler failed
    pub failed: usize,
    /// Why draining stopped
    pub stop: DrainStop,
}

impl BatchReport {
    /// Total number of jobs popped during the cycle
    #[must_use]
    pub const fn popped(&self) -> usize {
        self.processed + self.failed
    }
}

/// Long-lived consumer draining the source queue in batches
pub struct JobConsumer {
    queue: Arc<dyn JobQueuePort>,
    handler: Arc<dyn JobHandler>,
    metrics: Arc<dyn MetricsPort>,
    throughput: Arc<ThroughputCounter>,
    settings: ConsumerSettings,
}

impl std::fmt::Debug for JobConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConsumer")
            .field("settings", &self.settings)
            .field("throughput", &self.throughput)
            .finish_non_exhaustive()
    }
}

impl JobConsumer {
    /// Create a consumer with default settings
    pub fn new(
        queue: Arc<dyn JobQueuePort>,
        handler: Arc<dyn JobHandler>,
        metrics: Arc<dyn MetricsPort>,
        throughput: Arc<ThroughputCounter>,
    ) -> Self {
        Self {
            queue,
            handler,
            metrics,
            throughput,
            settings: ConsumerSettings::default(),
        }
    }

    /// Replace the consumer settings
    #[must_use]
    pub fn with_settings(mut self, settings: ConsumerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> &ConsumerSettings {
        &self.settings
    }

    /// Consume until the queue backend closes
    ///
    /// Transport errors on the blocking pop never stop the loop; consecutive
    /// failures are spaced out with exponential backoff.
    pub async fn run(&self) {
        info!(
            source = %self.settings.queues.source,
            processed = %self.settings.queues.processed,
            batch_size = self.settings.batch_size,
            "Starting job processor"
        );

        let mut consecutive_failures: u32 = 0;
        loop {
            match self.run_cycle().await {
                Ok(Some(report)) => {
                    consecutive_failures = 0;
                    debug!(
                        processed = report.processed,
                        failed = report.failed,
                        stop = ?report.stop,
                        "Drain cycle finished"
                    );
                },
                Ok(None) => {
                    info!("Job queue closed, stopping job processor");
                    return;
                },
                Err(e) => {
                    let delay = self.settings.backoff.delay_for_attempt(consecutive_failures);
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    error!(
                        error = %e,
                        consecutive_failures,
                        retryable = e.is_retryable(),
                        retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Error receiving job"
                    );
                    tokio::time::sleep(delay).await;
                },
            }
        }
    }

    /// Run one waiting + draining cycle
    ///
    /// Returns `Ok(None)` if the queue is closed, or the error of a failing
    /// blocking pop. Errors during draining end the cycle early and are
    /// reported through [`DrainStop::TransportError`].
    pub async fn run_cycle(&self) -> Result<Option<BatchReport>, ApplicationError> {
        let Some(first) = self.queue.pop_blocking(&self.settings.queues.source).await? else {
            return Ok(None);
        };
        Ok(Some(self.drain(first).await))
    }

    async fn drain(&self, first: Job) -> BatchReport {
        let mut report = BatchReport {
            processed: 0,
            failed: 0,
            stop: DrainStop::Ceiling,
        };
        self.tally(&mut report, first).await;

        for _ in 1..self.settings.batch_size {
            match self.queue.try_pop(&self.settings.queues.source).await {
                Ok(Some(job)) => self.tally(&mut report, job).await,
                Ok(None) => {
                    report.stop = DrainStop::Exhausted;
                    break;
                },
                Err(e) => {
                    error!(error = %e, "Error receiving job");
                    report.stop = DrainStop::TransportError;
                    break;
                },
            }
        }

        report
    }

    async fn tally(&self, report: &mut BatchReport, job: Job) {
        if self.process_job(job).await {
            report.processed += 1;
        } else {
            report.failed += 1;
        }
    }

    /// Process a single job and forward it downstream
    ///
    /// Returns `true` if the handler succeeded. Forwarding failures are
    /// logged and do not affect the result.
    pub async fn process_job(&self, job: Job) -> bool {
        let start = Instant::now();
        info!(job_data = %job, "Received job");

        if let Err(e) = self.handler.handle(&job).await {
            self.metrics.record_job_failed();
            error!(job_data = %job, error = %e, "Job processing failed");
            return false;
        }

        #[allow(clippy::cast_precision_loss)]
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(job_data = %job, duration_ms, "Processed job");

        self.metrics.record_job_processed();
        self.throughput.record();

        if let Err(e) = self.queue.push(&self.settings.queues.processed, &job).await {
            warn!(job_data = %job, error = %e, "Error pushing to processed queue");
        }

        true
    }
}
