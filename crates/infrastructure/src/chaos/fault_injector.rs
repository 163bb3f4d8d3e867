//! Fault injector for chaos engineering.
//!
//! Turns the current policy into a per-request decision and keeps count of
//! what was injected.

use std::sync::Arc;
use std::time::Duration;

use application::ports::{FaultKind, MetricsPort};
use domain::FaultPolicy;
use rand::Rng;
use tracing::debug;

use super::{ChaosContext, ChaosStats, FaultPolicyStore};

/// What to do to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultPlan {
    /// Delay to apply before anything else
    pub delay: Option<Duration>,
    /// Whether the request fails instead of reaching the handler
    pub fail: bool,
}

impl FaultPlan {
    /// Plan that leaves the request untouched
    pub const PASS: Self = Self {
        delay: None,
        fail: false,
    };

    /// Decide for one request given a policy and a uniform sample in `[0, 1)`
    #[must_use]
    pub fn decide(policy: &FaultPolicy, sample: f64) -> Self {
        let delay = (!policy.latency.is_zero()).then(|| policy.latency.as_duration());
        Self {
            delay,
            fail: policy.error_rate.triggers(sample),
        }
    }
}

/// Fault injector shared by every intercepted request
pub struct FaultInjector {
    store: FaultPolicyStore,
    context: ChaosContext,
    metrics: Option<Arc<dyn MetricsPort>>,
}

impl std::fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultInjector")
            .field("store", &self.store)
            .field("context", &self.context)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl FaultInjector {
    /// Create an injector reading from `store`
    pub fn new(store: FaultPolicyStore) -> Self {
        Self {
            store,
            context: ChaosContext::new(),
            metrics: None,
        }
    }

    /// Report injected faults to a metrics sink
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsPort>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The policy store this injector reads from
    pub const fn store(&self) -> &FaultPolicyStore {
        &self.store
    }

    /// Snapshot the policy, draw one sample and record the outcome
    pub fn plan(&self) -> FaultPlan {
        let policy = self.store.get();
        self.context.record_call();

        if policy.is_inert() {
            return FaultPlan::PASS;
        }

        let sample: f64 = rand::rng().random();
        let plan = FaultPlan::decide(&policy, sample);

        if let Some(delay) = plan.delay {
            self.context.record_latency(delay);
            self.report(FaultKind::Latency);
        }
        if plan.fail {
            self.context.record_error();
            self.report(FaultKind::Error);
        }

        debug!(
            delay_ms = plan.delay.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            fail = plan.fail,
            "Fault plan"
        );
        plan
    }

    fn report(&self, kind: FaultKind) {
        if let Some(metrics) = &self.metrics {
            metrics.record_fault_injected(kind);
        }
    }

    /// Get current statistics
    pub fn stats(&self) -> ChaosStats {
        self.context.stats_snapshot()
    }

    /// Reset the statistics
    pub fn reset_stats(&self) {
        self.context.reset();
    }
}
