//! Error rate value object
//!
//! Represents the probability that an intercepted request is failed on purpose.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::ErrorRate;
//!
//! let rate = ErrorRate::new(0.25).expect("valid rate");
//! assert!((rate.value() - 0.25).abs() < f64::EPSILON);
//!
//! // Out-of-range values are rejected, never clamped
//! assert!(ErrorRate::new(1.5).is_err());
//! assert!(ErrorRate::new(-0.1).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Probability in `[0, 1]` of injecting a failure
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ErrorRate(f64);

impl ErrorRate {
    /// Never inject failures
    pub const ZERO: Self = Self(0.0);

    /// Fail every request
    pub const ALWAYS: Self = Self(1.0);

    /// Create a validated error rate
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidErrorRate` if the value is not finite or
    /// lies outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidErrorRate(value))
        }
    }

    /// Get the rate as a float
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether this rate can ever inject a failure
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }

    /// Decide whether a uniform sample drawn from `[0, 1)` triggers a failure
    #[must_use]
    pub fn triggers(self, sample: f64) -> bool {
        sample < self.0
    }
}

impl TryFrom<f64> for ErrorRate {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ErrorRate> for f64 {
    fn from(rate: ErrorRate) -> Self {
        rate.0
    }
}

impl fmt::Display for ErrorRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(ErrorRate::new(0.0).is_ok());
        assert!(ErrorRate::new(1.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            ErrorRate::new(1.01),
            Err(DomainError::InvalidErrorRate(1.01))
        );
        assert!(ErrorRate::new(-0.5).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(ErrorRate::new(f64::NAN).is_err());
        assert!(ErrorRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn default_is_zero() {
        assert!(ErrorRate::default().is_zero());
        assert_eq!(ErrorRate::default(), ErrorRate::ZERO);
    }

    #[test]
    fn zero_never_triggers() {
        assert!(!ErrorRate::ZERO.triggers(0.0));
        assert!(!ErrorRate::ZERO.triggers(0.999));
    }

    #[test]
    fn always_triggers_for_any_sample_below_one() {
        assert!(ErrorRate::ALWAYS.triggers(0.0));
        assert!(ErrorRate::ALWAYS.triggers(0.999_999));
    }

    #[test]
    fn display_shows_raw_value() {
        let rate = ErrorRate::new(0.5).unwrap();
        assert_eq!(rate.to_string(), "0.5");
        assert_eq!(ErrorRate::ALWAYS.to_string(), "1");
    }

    #[test]
    fn deserialize_validates() {
        let ok: ErrorRate = serde_json::from_str("0.3").unwrap();
        assert!((ok.value() - 0.3).abs() < f64::EPSILON);

        let err = serde_json::from_str::<ErrorRate>("3.0");
        assert!(err.is_err());
    }
}
