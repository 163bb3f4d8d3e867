//! Process-local job queue adapter
//!
//! Named FIFO lists behind one mutex. A blocking pop parks on a `Notify`
//! until a push or `close()`. Used for local runs without Redis and as the
//! queue in end-to-end tests.

use std::collections::{HashMap, VecDeque};
use std::pin::pin;

use application::{error::ApplicationError, ports::JobQueuePort};
use async_trait::async_trait;
use domain::Job;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Default)]
struct Lists {
    queues: HashMap<String, VecDeque<Job>>,
    closed: bool,
}

/// In-memory implementation of [`JobQueuePort`]
#[derive(Debug, Default)]
pub struct InMemoryJobQueue {
    lists: Mutex<Lists>,
    changed: Notify,
}

impl InMemoryJobQueue {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append jobs to the tail of `queue`
    pub fn extend<I>(&self, queue: &str, jobs: I)
    where
        I: IntoIterator<Item = Job>,
    {
        self.lists
            .lock()
            .queues
            .entry(queue.to_string())
            .or_default()
            .extend(jobs);
        self.changed.notify_waiters();
    }

    /// Number of jobs waiting in `queue`
    pub fn len(&self, queue: &str) -> usize {
        self.lists.lock().queues.get(queue).map_or(0, VecDeque::len)
    }

    /// Whether `queue` holds no jobs
    pub fn is_empty(&self, queue: &str) -> bool {
        self.len(queue) == 0
    }

    /// Copy of `queue` in pop order
    pub fn snapshot(&self, queue: &str) -> Vec<Job> {
        self.lists
            .lock()
            .queues
            .get(queue)
            .map(|jobs| jobs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Wake blocked consumers and make further blocking pops on empty
    /// queues return `None`
    pub fn close(&self) {
        self.lists.lock().closed = true;
        self.changed.notify_waiters();
        debug!("In-memory job queue closed");
    }

    fn pop_front(&self, queue: &str) -> Option<Job> {
        self.lists.lock().queues.get_mut(queue)?.pop_front()
    }
}

#[async_trait]
impl JobQueuePort for InMemoryJobQueue {
    async fn pop_blocking(&self, queue: &str) -> Result<Option<Job>, ApplicationError> {
        loop {
            // Register interest before checking so a push in between is not missed
            let mut notified = pin!(self.changed.notified());
            notified.as_mut().enable();

            {
                let mut lists = self.lists.lock();
                if let Some(job) = lists.queues.get_mut(queue).and_then(VecDeque::pop_front) {
                    return Ok(Some(job));
                }
                if lists.closed {
                    return Ok(None);
                }
            }

            notified.await;
        }
    }

    async fn try_pop(&self, queue: &str) -> Result<Option<Job>, ApplicationError> {
        Ok(self.pop_front(queue))
    }

    async fn push(&self, queue: &str, job: &Job) -> Result<(), ApplicationError> {
        self.extend(queue, std::iter::once(job.clone()));
        Ok(())
    }
}
