//! The fault-injected demo endpoint

/// Greeting returned by the wrapped routes
pub const GREETING: &str = "Hello, Job Processor!";

/// Answer with the greeting
pub async fn greet() -> &'static str {
    GREETING
}
