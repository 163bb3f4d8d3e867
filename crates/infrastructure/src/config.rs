//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config.toml`, then `JOB_PROCESSOR_*` environment variables (nested keys
//! use `__`, e.g. `JOB_PROCESSOR_SERVER__PORT=9000`). `REDIS_URL` overrides
//! `queue.redis_url` last.

use std::time::Duration;

use application::{BackoffSettings, ConsumerSettings, QueueNames};
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Environment variable holding the queue address
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Queue backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// Redis lists
    #[default]
    Redis,
    /// Process-local queue, for local runs and tests
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log format: "json" for structured JSON logs, "text" for human-readable
    #[serde(default)]
    pub log_format: LogFormat,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: LogFormat::default(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Backend implementation
    #[serde(default)]
    pub backend: QueueBackend,

    /// Redis address, `redis://host:port` or bare `host:port`
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// List jobs are popped from
    #[serde(default = "default_source_queue")]
    pub source_queue: String,

    /// List processed jobs are pushed to
    #[serde(default = "default_processed_queue")]
    pub processed_queue: String,

    /// Server-side timeout of one blocking pop in seconds (0 = block forever)
    #[serde(default)]
    pub block_timeout_secs: u64,
}

fn default_redis_url() -> String {
    "redis://redis:6379".to_string()
}

fn default_source_queue() -> String {
    application::DEFAULT_SOURCE_QUEUE.to_string()
}

fn default_processed_queue() -> String {
    application::DEFAULT_PROCESSED_QUEUE.to_string()
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::default(),
            redis_url: default_redis_url(),
            source_queue: default_source_queue(),
            processed_queue: default_processed_queue(),
            block_timeout_secs: 0,
        }
    }
}

impl QueueConfig {
    /// Redis connection URL with the scheme filled in
    #[must_use]
    pub fn connection_url(&self) -> String {
        normalize_redis_url(&self.redis_url)
    }

    /// Queue names used by the consumer
    #[must_use]
    pub fn names(&self) -> QueueNames {
        QueueNames {
            source: self.source_queue.clone(),
            processed: self.processed_queue.clone(),
        }
    }
}

/// Consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerAppConfig {
    /// Maximum jobs per drain cycle (default: 10)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Simulated cost of one job in milliseconds (default: 100)
    #[serde(default = "default_work_cost")]
    pub work_cost_ms: u64,

    /// Throughput accounting window in milliseconds (default: 1000)
    #[serde(default = "default_throughput_window")]
    pub throughput_window_ms: u64,

    /// First backoff delay after a failing blocking pop (default: 100)
    #[serde(default = "default_backoff_initial")]
    pub backoff_initial_ms: u64,

    /// Backoff ceiling (default: 5000)
    #[serde(default = "default_backoff_max")]
    pub backoff_max_ms: u64,

    /// Backoff growth per consecutive failure (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

const fn default_batch_size() -> usize {
    application::DEFAULT_BATCH_SIZE
}

const fn default_work_cost() -> u64 {
    100
}

const fn default_throughput_window() -> u64 {
    1_000
}

const fn default_backoff_initial() -> u64 {
    100
}

const fn default_backoff_max() -> u64 {
    5_000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for ConsumerAppConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            work_cost_ms: default_work_cost(),
            throughput_window_ms: default_throughput_window(),
            backoff_initial_ms: default_backoff_initial(),
            backoff_max_ms: default_backoff_max(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl ConsumerAppConfig {
    /// Simulated cost of one job
    #[must_use]
    pub const fn work_cost(&self) -> Duration {
        Duration::from_millis(self.work_cost_ms)
    }

    /// Throughput accounting window
    #[must_use]
    pub const fn throughput_window(&self) -> Duration {
        Duration::from_millis(self.throughput_window_ms)
    }

    /// Backoff for blocking pop failures
    #[must_use]
    pub fn backoff(&self) -> BackoffSettings {
        BackoffSettings {
            initial_delay_ms: self.backoff_initial_ms,
            max_delay_ms: self.backoff_max_ms,
            multiplier: self.backoff_multiplier,
            ..BackoffSettings::default()
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Queue configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Consumer configuration
    #[serde(default)]
    pub consumer: ConsumerAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(None, std::env::var(REDIS_URL_ENV).ok())
    }

    /// Build from an explicit environment map instead of the process environment
    ///
    /// `env` entries use the same `JOB_PROCESSOR_*` keys as real variables.
    pub fn build(
        env: Option<config::Map<String, String>>,
        redis_url: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., JOB_PROCESSOR_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix("JOB_PROCESSOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("queue.redis_url", redis_url)?;

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the consumer cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.consumer.batch_size == 0 {
            return Err(config::ConfigError::Message(
                "consumer.batch_size must be at least 1".to_string(),
            ));
        }
        if self.consumer.throughput_window_ms == 0 {
            return Err(config::ConfigError::Message(
                "consumer.throughput_window_ms must be at least 1".to_string(),
            ));
        }
        if !self.consumer.backoff_multiplier.is_finite() || self.consumer.backoff_multiplier < 1.0
        {
            return Err(config::ConfigError::Message(format!(
                "consumer.backoff_multiplier must be >= 1.0, got {}",
                self.consumer.backoff_multiplier
            )));
        }
        if self.queue.source_queue == self.queue.processed_queue {
            return Err(config::ConfigError::Message(format!(
                "queue.source_queue and queue.processed_queue must differ, both are '{}'",
                self.queue.source_queue
            )));
        }
        Ok(())
    }

    /// Settings for the batch consumer
    #[must_use]
    pub fn consumer_settings(&self) -> ConsumerSettings {
        ConsumerSettings::default()
            .with_batch_size(self.consumer.batch_size)
            .with_queues(self.queue.names())
            .with_backoff(self.consumer.backoff())
    }
}

/// Prepend `redis://` to a bare `host:port` address
#[must_use]
pub fn normalize_redis_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("redis://{url}")
    }
}
