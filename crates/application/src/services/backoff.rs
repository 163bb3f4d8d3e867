//! Exponential backoff for queue transport failures
//!
//! The consumer retries a failing blocking pop forever; backoff keeps a
//! sustained outage from turning the loop into a busy spin.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff parameters for retrying a failing blocking pop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffSettings {
    /// Delay before the first retry in milliseconds (default: 100ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds (default: 5000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier applied per consecutive failure (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Maximum jitter factor (0.0 to 1.0, default: 0.1 = 10%)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    100
}

const fn default_max_delay() -> u64 {
    5_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl BackoffSettings {
    /// Create backoff settings without jitter
    #[must_use]
    pub const fn new(initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            jitter_factor: 0.0,
        }
    }

    /// Disable jitter
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_factor = 0.0;
        self
    }

    /// Calculate the delay after `failures` consecutive failures (0-indexed)
    ///
    /// delay = initial_delay * multiplier^failures, capped at max_delay,
    /// then spread by up to `jitter_factor` in either direction.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, failures: u32) -> Duration {
        let exponent = failures.min(i32::MAX as u32) as i32;
        let base_delay = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.jitter_factor > 0.0 {
            let jitter_range = capped_delay * self.jitter_factor;
            let jitter = rand::rng().random_range(-jitter_range..=jitter_range);
            (capped_delay + jitter).max(0.0)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }
}
