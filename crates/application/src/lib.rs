//! Application layer - Use cases and orchestration
//!
//! Contains the batch consumer loop, throughput accounting and the port
//! definitions for the job queue, the unit of work and the metrics sink.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
