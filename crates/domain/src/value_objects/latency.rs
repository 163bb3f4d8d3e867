//! Injected latency value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::errors::DomainError;

/// Delay added in front of every intercepted request
///
/// Always non-negative; zero means no delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Latency(Duration);

impl Latency {
    /// No added delay
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Wrap an existing duration
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// Build a latency from a number of seconds
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLatency` for negative, non-finite or
    /// unrepresentably large values.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use domain::value_objects::Latency;
    ///
    /// let latency = Latency::from_secs_f64(1.5).expect("valid latency");
    /// assert_eq!(latency.as_duration(), Duration::from_millis(1500));
    /// assert!(Latency::from_secs_f64(-1.0).is_err());
    /// ```
    pub fn from_secs_f64(seconds: f64) -> Result<Self, DomainError> {
        if !seconds.is_finite() {
            return Err(DomainError::invalid_latency(format!(
                "{seconds} is not a finite number of seconds"
            )));
        }
        if seconds < 0.0 {
            return Err(DomainError::invalid_latency(format!(
                "{seconds} seconds is negative"
            )));
        }
        Duration::try_from_secs_f64(seconds)
            .map(Self)
            .map_err(|e| DomainError::invalid_latency(format!("{seconds} seconds: {e}")))
    }

    /// Get the underlying duration
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Whether no delay is configured
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for Latency {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

/// Formats like `0s`, `250ms`, `1.5s`, `1m30s` or `2h0m0s`
impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        if d.is_zero() {
            return f.write_str("0s");
        }
        if d < Duration::from_secs(1) {
            return write!(f, "{d:?}");
        }

        let total = d.as_secs();
        let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
        if hours > 0 {
            write!(f, "{hours}h{minutes}m")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m")?;
        }

        let nanos = d.subsec_nanos();
        if nanos == 0 {
            write!(f, "{seconds}s")
        } else {
            let fraction = format!("{nanos:09}");
            write!(f, "{seconds}.{}s", fraction.trim_end_matches('0'))
        }
    }
}
