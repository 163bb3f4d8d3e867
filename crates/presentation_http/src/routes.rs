//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, middleware::FaultInjectionLayer, state::AppState};

/// Create the main router with all routes
///
/// Only the greeting routes are fault-injected. Health, metrics and the
/// control endpoints stay reachable whatever the policy says.
pub fn create_router(state: AppState) -> Router {
    let wrapped = Router::new()
        .route("/", get(handlers::root::greet))
        .fallback(handlers::root::greet)
        .layer(FaultInjectionLayer::new(state.injector.clone()));

    Router::new()
        // Health and observability
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Fault policy control
        .route("/entropy/latency", post(handlers::entropy::set_latency))
        .route("/entropy/errors", post(handlers::entropy::set_error_rate))
        .route(
            "/entropy",
            get(handlers::entropy::get_entropy).delete(handlers::entropy::reset_entropy),
        )
        .merge(wrapped)
        // Attach state
        .with_state(state)
}
