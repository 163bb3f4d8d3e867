//! Value Objects - Immutable, identity-less domain primitives

mod error_rate;
mod fault_policy;
mod latency;

pub use error_rate::ErrorRate;
pub use fault_policy::FaultPolicy;
pub use latency::Latency;
