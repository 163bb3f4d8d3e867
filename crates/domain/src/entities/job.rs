//! Job entity

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of work pulled from the job queue
///
/// The payload is opaque: no structure is assumed and it is forwarded
/// downstream unchanged. Identity is the raw content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Job {
    payload: String,
}

impl Job {
    /// Create a job from its raw payload
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Borrow the raw payload
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Consume the job, returning the raw payload
    #[must_use]
    pub fn into_payload(self) -> String {
        self.payload
    }
}

impl From<String> for Job {
    fn from(payload: String) -> Self {
        Self { payload }
    }
}

impl From<&str> for Job {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.payload)
    }
}
