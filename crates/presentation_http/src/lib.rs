//! HTTP presentation layer for the job processor
//!
//! Serves the fault-injected greeting, the fault policy control endpoints,
//! health and Prometheus metrics, and hosts the background consumer tasks.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use middleware::{FaultInjectionLayer, RequestIdLayer, ValidatedJson, ValidationError};
pub use routes::create_router;
pub use state::AppState;
pub use tasks::{spawn_job_consumer, spawn_throughput_sampler};
