//! Request ID middleware
//!
//! Every request runs inside an `http_request` span carrying a request ID,
//! and every response echoes that ID in `X-Request-Id`. A well-formed ID
//! sent by the client is kept; anything else is replaced by a fresh UUIDv7.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    response::Response,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// The header name for the request ID
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied ID that is kept
const MAX_CLIENT_ID_LEN: usize = 128;

/// Layer that tags each request with a request ID
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    /// Create a new request ID layer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service that assigns and echoes request IDs
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

/// Request ID stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(HeaderValue);

impl RequestId {
    fn from_request<B>(request: &Request<B>) -> Self {
        request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .filter(|value| is_acceptable(value))
            .cloned()
            .map_or_else(Self::generate, Self)
    }

    fn generate() -> Self {
        // A hyphenated UUID is always a valid header value
        let id = Uuid::now_v7().to_string();
        Self(HeaderValue::from_str(&id).unwrap_or(HeaderValue::from_static("unknown")))
    }

    /// The ID as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_acceptable(value: &HeaderValue) -> bool {
    value.to_str().is_ok_and(|s| {
        !s.is_empty()
            && s.len() <= MAX_CLIENT_ID_LEN
            && s.bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    })
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
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

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let request_id = RequestId::from_request(&request);
        request.extensions_mut().insert(request_id.clone());

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri().path(),
        );

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;
                response
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER.clone(), request_id.0);
                Ok(response)
            }
            .instrument(span),
        )
    }
}
