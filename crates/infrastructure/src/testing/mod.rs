//! Test helpers for the infrastructure crate
//!
//! Tests using the container are `#[ignore]`d by default since they need
//! Docker.

mod containers;

pub use containers::{ContainerError, DEFAULT_REDIS_TAG, RedisContainer};
