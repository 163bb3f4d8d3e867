//! Request validation
//!
//! Provides a `ValidatedJson` extractor that parses the body as JSON whatever
//! the `Content-Type` header says, then validates it with the validator crate.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid request body: {0}")]
    Body(#[from] BytesRejection),
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Body(e) => e.body_text(),
            Self::JsonError(e) => e.to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "validation_error"
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A JSON extractor that also validates the request body
///
/// Unlike `Json<T>` it does not insist on `Content-Type: application/json`,
/// and every failure (unreadable body, malformed JSON, missing field, wrong
/// type, failed rule) is a `400`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value: T = serde_json::from_slice(&bytes)?;

        value.validate().map_err(|e| {
            // Format validation errors nicely
            let errors: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|error| {
                            format!(
                                "{}: {}",
                                field,
                                error
                                    .message
                                    .as_ref()
                                    .map_or_else(|| error.code.to_string(), ToString::to_string)
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect();

            ValidationError::ValidationFailed(errors.join("; "))
        })?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestRequest {
        #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
        ratio: f64,
    }

    async fn test_handler(ValidatedJson(req): ValidatedJson<TestRequest>) -> String {
        req.ratio.to_string()
    }

    fn create_test_app() -> Router {
        Router::new().route("/test", post(test_handler))
    }

    async fn send(body: &str, content_type: Option<&str>) -> Response {
        let mut builder = axum::http::Request::builder().method("POST").uri("/test");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        create_test_app()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    async fn error_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_request_passes() {
        let response = send(r#"{"ratio": 0.5}"#, Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_content_type_is_accepted() {
        let response = send(r#"{"ratio": 0.5}"#, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_rejected() {
        let response = send("{ratio:", Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn missing_field_rejected() {
        let response = send("{}", Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_type_rejected() {
        let response = send(r#"{"ratio": "high"}"#, Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_rejected_with_message() {
        let response = send(r#"{"ratio": 1.5}"#, Some("application/json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = error_body(response).await;
        assert_eq!(body["code"], "validation_error");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("must be between 0 and 1")
        );
    }
}
