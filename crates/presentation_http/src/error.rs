//! API error handling
//!
//! Control endpoints answer client mistakes with `400` and a JSON body of the
//! form `{"error": ..., "code": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn api_error_validation_message() {
        let err = ApiError::Validation("latency: negative".to_string());
        assert_eq!(err.to_string(), "Validation failed: latency: negative");
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let response = ApiError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["error"], "bad");
    }

    #[test]
    fn domain_errors_are_validation_errors() {
        let err: ApiError = DomainError::InvalidErrorRate(1.5).into();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("1.5")));
    }
}
