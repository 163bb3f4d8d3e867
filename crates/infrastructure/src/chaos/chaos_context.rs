//! Chaos context for tracking fault injection statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Statistics about fault injection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosStats {
    /// Total number of requests that passed through the injector
    pub total_calls: u64,
    /// Number of requests failed on purpose
    pub errors_injected: u64,
    /// Number of requests delayed on purpose
    pub latency_injected: u64,
    /// Total latency added (milliseconds)
    pub total_latency_added_ms: u64,
}

impl ChaosStats {
    /// Share of calls that were failed on purpose
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_error_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.errors_injected as f64 / self.total_calls as f64
        }
    }
}

/// Lock-free counters shared by all requests
#[derive(Debug, Default)]
pub struct ChaosContext {
    total_calls: AtomicU64,
    errors_injected: AtomicU64,
    latency_injected: AtomicU64,
    total_latency_added_ms: AtomicU64,
}

impl ChaosContext {
    /// Create a new chaos context
    pub const fn new() -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            errors_injected: AtomicU64::new(0),
            latency_injected: AtomicU64::new(0),
            total_latency_added_ms: AtomicU64::new(0),
        }
    }

    /// Record a call being processed
    pub fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an error injection
    pub fn record_error(&self) {
        self.errors_injected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a latency injection
    pub fn record_latency(&self, latency: Duration) {
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_injected.fetch_add(1, Ordering::Relaxed);
        // Saturate instead of wrapping on absurd latencies
        let _ = self.total_latency_added_ms.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |total| Some(total.saturating_add(latency_ms)),
        );
    }

    /// Get a copy of current statistics
    pub fn stats_snapshot(&self) -> ChaosStats {
        ChaosStats {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            errors_injected: self.errors_injected.load(Ordering::Relaxed),
            latency_injected: self.latency_injected.load(Ordering::Relaxed),
            total_latency_added_ms: self.total_latency_added_ms.load(Ordering::Relaxed),
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.total_calls.store(0, Ordering::Relaxed);
        self.errors_injected.store(0, Ordering::Relaxed);
        self.latency_injected.store(0, Ordering::Relaxed);
        self.total_latency_added_ms.store(0, Ordering::Relaxed);
    }
}
