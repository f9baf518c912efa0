use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": "...", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, error: error.to_string(), message }
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(path.to_string()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(_) => {
                error!(err = %e, "dataset violates expected format");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Invalid Dataset", Some(e.to_string()))
            }
            ServiceError::Db(_) => {
                error!(err = %e, "data store query failed");
                JsonApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Data Store Unavailable", Some(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database setup failed: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_to_5xx() {
        let e: JsonApiError = ServiceError::Db("connection refused".into()).into();
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(e.status.is_server_error());

        let e: JsonApiError = ServiceError::Validation("bad date".into()).into();
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_omits_missing_message() {
        let body = serde_json::to_value(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", None)).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Not Found"}));
    }
}
