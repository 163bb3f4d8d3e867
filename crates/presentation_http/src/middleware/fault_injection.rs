//! Fault injection middleware
//!
//! Wraps a service so that every request first consults the shared
//! [`FaultInjector`]: it may be delayed by the configured latency and may be
//! answered with a plain `500 Internal Server Error` instead of reaching the
//! inner service. The policy is snapshotted once per request, so a request
//! never mixes fields from two different writes.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use infrastructure::FaultInjector;
use tower::{Layer, Service};
use tracing::debug;

/// Body of an injected failure
pub const INJECTED_ERROR_BODY: &str = "Internal Server Error";

/// Layer that adds fault injection to HTTP services
#[derive(Debug, Clone)]
pub struct FaultInjectionLayer {
    injector: Arc<FaultInjector>,
}

impl FaultInjectionLayer {
    /// Create a layer driven by `injector`
    #[must_use]
    pub const fn new(injector: Arc<FaultInjector>) -> Self {
        Self { injector }
    }
}

impl<S> Layer<S> for FaultInjectionLayer {
    type Service = FaultInjectionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FaultInjectionService {
            inner,
            injector: Arc::clone(&self.injector),
        }
    }
}

/// Service that delays or fails requests according to the fault policy
#[derive(Debug, Clone)]
pub struct FaultInjectionService<S> {
    inner: S,
    injector: Arc<FaultInjector>,
}

impl<S, B> Service<Request<B>> for FaultInjectionService<S>
where
    S: Service<Request<B>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let plan = self.injector.plan();

        // Take the service that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            if let Some(delay) = plan.delay {
                debug!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Injecting latency"
                );
                tokio::time::sleep(delay).await;
            }

            if plan.fail {
                debug!("Injecting error");
                return Ok(
                    (StatusCode::INTERNAL_SERVER_ERROR, INJECTED_ERROR_BODY).into_response(),
                );
            }

            inner.call(request).await
        })
    }
}
