//! Fault policy control endpoints
//!
//! These routes sit outside the fault injection layer so the policy can
//! always be changed, even while every wrapped request is failing.

use axum::{Json, extract::State};
use domain::{ErrorRate, Latency};
use infrastructure::ChaosStats;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Body of `POST /entropy/latency`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetLatencyRequest {
    /// Delay in seconds
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub latency: f64,
}

/// Body of `POST /entropy/errors`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetErrorRateRequest {
    /// Failure probability
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    pub error_rate: f64,
}

/// Current policy together with injection statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyResponse {
    /// Delay in seconds
    pub latency: f64,
    /// Failure probability
    pub error_rate: f64,
    /// Counts since start or the last reset
    pub stats: ChaosStats,
}

/// Set the injected latency
pub async fn set_latency(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SetLatencyRequest>,
) -> Result<String, ApiError> {
    let latency = Latency::from_secs_f64(request.latency)?;
    state.policy.set_latency(latency);
    info!(%latency, "Latency updated");

    Ok(format!("Latency set to {latency}"))
}

/// Set the injected error rate
pub async fn set_error_rate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SetErrorRateRequest>,
) -> Result<String, ApiError> {
    let error_rate = ErrorRate::new(request.error_rate)?;
    state.policy.set_error_rate(error_rate);
    info!(%error_rate, "Error rate updated");

    Ok(format!("Error rate set to {error_rate}"))
}

/// Report the current policy
pub async fn get_entropy(State(state): State<AppState>) -> Json<EntropyResponse> {
    let policy = state.policy.get();

    Json(EntropyResponse {
        latency: policy.latency.as_duration().as_secs_f64(),
        error_rate: policy.error_rate.value(),
        stats: state.injector.stats(),
    })
}

/// Clear the policy and the injection statistics
pub async fn reset_entropy(State(state): State<AppState>) -> &'static str {
    state.policy.reset();
    state.injector.reset_stats();
    info!("Fault policy reset");

    "Entropy reset"
}
