//! HTTP request handlers

pub mod entropy;
pub mod health;
pub mod metrics;
pub mod root;
