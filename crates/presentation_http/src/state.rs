//! Application state shared across handlers

use std::sync::Arc;

use application::ports::MetricsPort;
use infrastructure::{FaultInjector, FaultPolicyStore, PrometheusMetrics};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fault policy written by the control endpoints
    pub policy: FaultPolicyStore,
    /// Injector consulted by the fault injection layer
    pub injector: Arc<FaultInjector>,
    /// Metrics sink rendered by `/metrics`
    pub metrics: Arc<PrometheusMetrics>,
}

impl AppState {
    /// Create state with an inert policy whose injections are reported to `metrics`
    pub fn new(metrics: Arc<PrometheusMetrics>) -> Self {
        let policy = FaultPolicyStore::new();
        let injector = FaultInjector::new(policy.clone())
            .with_metrics(Arc::clone(&metrics) as Arc<dyn MetricsPort>);

        Self {
            policy,
            injector: Arc::new(injector),
            metrics,
        }
    }
}
