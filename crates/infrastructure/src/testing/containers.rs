//! Disposable Redis for the queue adapter tests
//!
//! Besides the container itself the fixture keeps a raw connection so tests
//! can seed the source list the way a producer would and inspect the
//! processed list the way a verifier would.

use redis::aio::MultiplexedConnection;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::redis::{REDIS_PORT, Redis};
use tracing::debug;

/// Image tag used unless a test asks for another one
pub const DEFAULT_REDIS_TAG: &str = "7-alpine";

/// Running Redis container, removed when dropped
pub struct RedisContainer {
    _container: ContainerAsync<Redis>,
    url: String,
    producer: MultiplexedConnection,
}

impl std::fmt::Debug for RedisContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisContainer")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl RedisContainer {
    /// Start Redis with the default image tag
    pub async fn start() -> Result<Self, ContainerError> {
        Self::start_tagged(DEFAULT_REDIS_TAG).await
    }

    /// Start Redis from a specific image tag
    pub async fn start_tagged(tag: &str) -> Result<Self, ContainerError> {
        let container = Redis::default()
            .with_tag(tag)
            .start()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;
        let port = container
            .get_host_port_ipv4(REDIS_PORT)
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;
        let url = format!("redis://{host}:{port}");

        let producer = redis::Client::open(url.as_str())
            .map_err(|e| ContainerError::Client(e.to_string()))?
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ContainerError::Client(e.to_string()))?;

        debug!(%url, tag, "Redis container started");

        Ok(Self {
            _container: container,
            url,
            producer,
        })
    }

    /// Address the adapter under test should connect to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Append payloads to the tail of `queue`, as a producer does
    pub async fn seed(&self, queue: &str, payloads: &[&str]) -> Result<(), ContainerError> {
        let mut conn = self.producer.clone();
        let _: i64 = redis::cmd("RPUSH")
            .arg(queue)
            .arg(payloads)
            .query_async(&mut conn)
            .await
            .map_err(|e| ContainerError::Client(e.to_string()))?;
        Ok(())
    }

    /// Take the oldest entry of `queue` with `BRPOP`, as a verifier does
    pub async fn take_oldest(&self, queue: &str) -> Result<Option<String>, ContainerError> {
        let mut conn = self.producer.clone();
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(queue)
            .arg(1)
            .query_async(&mut conn)
            .await
            .map_err(|e| ContainerError::Client(e.to_string()))?;
        Ok(popped.map(|(_, payload)| payload))
    }
}

/// Errors raised while preparing the container
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Container failed to start
    #[error("Container failed to start: {0}")]
    Start(String),
    /// Seeding or inspection connection failed
    #[error("Redis client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_error_display() {
        assert_eq!(
            ContainerError::Start("no docker".to_string()).to_string(),
            "Container failed to start: no docker"
        );
        assert_eq!(
            ContainerError::Client("refused".to_string()).to_string(),
            "Redis client error: refused"
        );
    }
}
