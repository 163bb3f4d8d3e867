//! Health check handler

use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness check, never fault-injected
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health_check().await;
        assert_eq!(body.status, "ok");
    }

    #[test]
    fn health_response_serialization() {
        let json = serde_json::to_string(&HealthResponse {
            status: "ok".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
