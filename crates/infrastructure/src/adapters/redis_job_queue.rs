//! Redis list-backed job queue adapter
//!
//! Jobs are popped from the head of the source list (`BLPOP` / `LPOP`) and
//! pushed to the head of the processed list (`LPUSH`), so a verifier using
//! `BRPOP` on the processed list sees jobs in arrival order.
//!
//! Blocking pops run on their own multiplexed connection: a `BLPOP` holds
//! its connection until it returns, and commands queued behind it on the
//! same connection would wait just as long. Connections are opened lazily
//! and dropped after any error so the next call reconnects.

use application::{error::ApplicationError, ports::JobQueuePort};
use async_trait::async_trait;
use domain::Job;
use parking_lot::Mutex;
use redis::aio::MultiplexedConnection;
use tracing::{debug, instrument, trace, warn};

/// Errors raised by the Redis queue adapter
#[derive(Debug, thiserror::Error)]
pub enum RedisQueueError {
    /// Invalid URL or failed connection attempt
    #[error("Redis connection error: {0}")]
    Connection(String),

    /// Command sent but answered with an error
    #[error("Redis command error: {0}")]
    Command(String),
}

impl From<RedisQueueError> for ApplicationError {
    fn from(err: RedisQueueError) -> Self {
        Self::Queue(err.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
enum Lane {
    Blocking,
    Commands,
}

/// Redis implementation of [`JobQueuePort`]
pub struct RedisJobQueue {
    client: redis::Client,
    block_timeout_secs: u64,
    blocking: Mutex<Option<MultiplexedConnection>>,
    commands: Mutex<Option<MultiplexedConnection>>,
}

impl std::fmt::Debug for RedisJobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisJobQueue")
            .field("block_timeout_secs", &self.block_timeout_secs)
            .field("blocking_connected", &self.blocking.lock().is_some())
            .field("commands_connected", &self.commands.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl RedisJobQueue {
    /// Create an adapter for `redis_url` (e.g. "redis://redis:6379")
    ///
    /// Only the URL is validated here; no connection is opened until the
    /// first command.
    pub fn new(redis_url: impl AsRef<str>) -> Result<Self, RedisQueueError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisQueueError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            block_timeout_secs: 0,
            blocking: Mutex::new(None),
            commands: Mutex::new(None),
        })
    }

    /// Server-side timeout of one `BLPOP` (0 blocks forever)
    ///
    /// A timed-out `BLPOP` is reissued; it only bounds how long a dead
    /// connection can go unnoticed.
    #[must_use]
    pub const fn with_block_timeout(mut self, seconds: u64) -> Self {
        self.block_timeout_secs = seconds;
        self
    }

    const fn slot(&self, lane: Lane) -> &Mutex<Option<MultiplexedConnection>> {
        match lane {
            Lane::Blocking => &self.blocking,
            Lane::Commands => &self.commands,
        }
    }

    async fn connection(&self, lane: Lane) -> Result<MultiplexedConnection, RedisQueueError> {
        let cached = self.slot(lane).lock().clone();
        if let Some(conn) = cached {
            return Ok(conn);
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RedisQueueError::Connection(e.to_string()))?;
        debug!(lane = ?lane, "Connected to Redis");

        *self.slot(lane).lock() = Some(conn.clone());
        Ok(conn)
    }

    fn invalidate(&self, lane: Lane, err: &redis::RedisError) -> RedisQueueError {
        self.slot(lane).lock().take();
        warn!(lane = ?lane, error = %err, "Dropping Redis connection after error");
        RedisQueueError::Command(err.to_string())
    }
}

#[async_trait]
impl JobQueuePort for RedisJobQueue {
    #[instrument(skip(self))]
    async fn pop_blocking(&self, queue: &str) -> Result<Option<Job>, ApplicationError> {
        loop {
            let mut conn = self.connection(Lane::Blocking).await?;
            let popped: Option<(String, String)> = redis::cmd("BLPOP")
                .arg(queue)
                .arg(self.block_timeout_secs)
                .query_async(&mut conn)
                .await
                .map_err(|e| self.invalidate(Lane::Blocking, &e))?;

            match popped {
                Some((_, payload)) => return Ok(Some(Job::new(payload))),
                None => trace!(queue, "BLPOP timed out, waiting again"),
            }
        }
    }

    #[instrument(skip(self))]
    async fn try_pop(&self, queue: &str) -> Result<Option<Job>, ApplicationError> {
        let mut conn = self.connection(Lane::Commands).await?;
        let popped: Option<String> = redis::cmd("LPOP")
            .arg(queue)
            .query_async(&mut conn)
            .await
            .map_err(|e| self.invalidate(Lane::Commands, &e))?;

        Ok(popped.map(Job::new))
    }

    #[instrument(skip(self, job))]
    async fn push(&self, queue: &str, job: &Job) -> Result<(), ApplicationError> {
        let mut conn = self.connection(Lane::Commands).await?;
        let length: i64 = redis::cmd("LPUSH")
            .arg(queue)
            .arg(job.payload())
            .query_async(&mut conn)
            .await
            .map_err(|e| self.invalidate(Lane::Commands, &e))?;

        trace!(queue, length, "Pushed job");
        Ok(())
    }
}
