//! Runtime-mutable fault policy.

use std::sync::Arc;

use arc_swap::ArcSwap;
use domain::{ErrorRate, FaultPolicy, Latency};

/// Shared holder of the current [`FaultPolicy`]
///
/// Readers get a consistent snapshot without blocking. Field writers go
/// through `rcu`, so a latency write racing an error-rate write keeps both.
/// Clones share the same policy.
#[derive(Debug, Clone, Default)]
pub struct FaultPolicyStore {
    current: Arc<ArcSwap<FaultPolicy>>,
}

impl FaultPolicyStore {
    /// Create a store holding an inert policy
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(FaultPolicy::none())
    }

    /// Create a store holding `policy`
    #[must_use]
    pub fn with_policy(policy: FaultPolicy) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(policy)),
        }
    }

    /// Snapshot of the current policy
    #[must_use]
    pub fn get(&self) -> FaultPolicy {
        **self.current.load()
    }

    /// Replace the latency, keeping the error rate
    pub fn set_latency(&self, latency: Latency) {
        self.current
            .rcu(|policy| FaultPolicy::with_latency(**policy, latency));
    }

    /// Replace the error rate, keeping the latency
    pub fn set_error_rate(&self, error_rate: ErrorRate) {
        self.current
            .rcu(|policy| FaultPolicy::with_error_rate(**policy, error_rate));
    }

    /// Replace the whole policy
    pub fn replace(&self, policy: FaultPolicy) {
        self.current.store(Arc::new(policy));
    }

    /// Back to an inert policy
    pub fn reset(&self) {
        self.replace(FaultPolicy::none());
    }
}
