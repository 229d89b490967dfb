use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::MisionalError;

/// Wire-facing error: a status code and a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<MisionalError> for ApiError {
    fn from(err: MisionalError) -> Self {
        let status = match &err {
            MisionalError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            MisionalError::WardNotFound(_) => StatusCode::NOT_FOUND,
            MisionalError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            MisionalError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}
