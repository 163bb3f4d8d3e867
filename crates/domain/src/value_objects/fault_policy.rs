//! Fault policy definition for chaos testing.
//!
//! A policy describes how intercepted requests are degraded: a fixed delay
//! and a probability of failing outright. Policies are immutable values;
//! changing the policy means replacing the whole value.

use serde::{Deserialize, Serialize};

use super::{ErrorRate, Latency};

/// Current fault injection settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaultPolicy {
    /// Delay added before the request is handled
    pub latency: Latency,
    /// Probability of short-circuiting the request with a failure
    pub error_rate: ErrorRate,
}

impl FaultPolicy {
    /// A policy that injects nothing
    #[must_use]
    pub const fn none() -> Self {
        Self {
            latency: Latency::ZERO,
            error_rate: ErrorRate::ZERO,
        }
    }

    /// Create a policy from both settings
    #[must_use]
    pub const fn new(latency: Latency, error_rate: ErrorRate) -> Self {
        Self {
            latency,
            error_rate,
        }
    }

    /// Replace the latency, keeping the error rate
    #[must_use]
    pub const fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the error rate, keeping the latency
    #[must_use]
    pub const fn with_error_rate(mut self, error_rate: ErrorRate) -> Self {
        self.error_rate = error_rate;
        self
    }

    /// Whether this policy leaves requests untouched
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.latency.is_zero() && self.error_rate.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn default_is_inert() {
        let policy = FaultPolicy::default();
        assert!(policy.is_inert());
        assert_eq!(policy, FaultPolicy::none());
    }

    #[test]
    fn with_latency_keeps_error_rate() {
        let rate = ErrorRate::new(0.4).unwrap();
        let policy = FaultPolicy::none()
            .with_error_rate(rate)
            .with_latency(Latency::new(Duration::from_millis(20)));

        assert_eq!(policy.error_rate, rate);
        assert_eq!(policy.latency.as_duration(), Duration::from_millis(20));
        assert!(!policy.is_inert());
    }

    #[test]
    fn with_error_rate_keeps_latency() {
        let latency = Latency::new(Duration::from_secs(2));
        let policy = FaultPolicy::new(latency, ErrorRate::ZERO).with_error_rate(ErrorRate::ALWAYS);

        assert_eq!(policy.latency, latency);
        assert_eq!(policy.error_rate, ErrorRate::ALWAYS);
    }

    #[test]
    fn serialization_roundtrip_validates_rate() {
        let json = r#"{"latency":{"secs":1,"nanos":0},"error_rate":0.5}"#;
        let policy: FaultPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.latency.as_duration(), Duration::from_secs(1));

        let bad = r#"{"latency":{"secs":1,"nanos":0},"error_rate":5.0}"#;
        assert!(serde_json::from_str::<FaultPolicy>(bad).is_err());
    }
}
