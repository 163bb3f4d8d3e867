//! Runtime fault injection for chaos testing.
//!
//! # Overview
//!
//! - `FaultPolicyStore`: the current policy, swapped as a whole value
//! - `FaultInjector`: turns the policy into a per-request `FaultPlan`
//! - `ChaosContext`: counters of what was injected, exposed as `ChaosStats`
//!
//! # Example
//!
//! ```
//! use domain::ErrorRate;
//! use infrastructure::chaos::{FaultInjector, FaultPolicyStore};
//!
//! let store = FaultPolicyStore::new();
//! let injector = FaultInjector::new(store.clone());
//!
//! store.set_error_rate(ErrorRate::ALWAYS);
//! assert!(injector.plan().fail);
//! ```

mod chaos_context;
mod fault_injector;
mod policy_store;

pub use chaos_context::{ChaosContext, ChaosStats};
pub use fault_injector::{FaultInjector, FaultPlan};
pub use policy_store::FaultPolicyStore;
