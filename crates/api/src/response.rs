//! Error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use inventaris_shared::AppError;

/// Wrapper turning an [`AppError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // The category lives in the code; the message carries the bare detail
        // the UI matches on (e.g. "label_required").
        let (AppError::Validation(message)
        | AppError::NotFound(message)
        | AppError::Transient(message)
        | AppError::Database(message)
        | AppError::Internal(message)) = &self.0;
        let body = Json(json!({
            "error": {
                "code": self.0.error_code(),
                "message": message,
            }
        }));
        (status, body).into_response()
    }
}
