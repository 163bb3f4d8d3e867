//! Prometheus exposition endpoint

use axum::{extract::State, http::header, response::IntoResponse};

use crate::state::AppState;

/// Content type of the Prometheus text format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every registered series
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}
