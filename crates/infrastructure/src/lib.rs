//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the Redis and in-memory queues, the Prometheus metrics sink,
//! the runtime fault policy, configuration loading and logging setup.

pub mod adapters;
pub mod chaos;
pub mod config;
pub mod logging;
#[cfg(test)]
pub mod testing;

pub use adapters::*;
pub use chaos::{ChaosStats, FaultInjector, FaultPlan, FaultPolicyStore};
pub use config::{AppConfig, ConsumerAppConfig, QueueBackend, QueueConfig, ServerConfig};
pub use logging::{LogFormat, init_logging};
