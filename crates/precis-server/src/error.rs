use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use precis_core::classify;
use precis_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
///
/// Carries the normalized target URL, when known, so connection failures
/// can name it.
pub struct ApiError {
    pub error: AppError,
    pub url: Option<String>,
}

impl ApiError {
    pub fn new(error: AppError, url: Option<String>) -> Self {
        Self { error, url }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let classified = classify(&self.error, self.url.as_deref());
        let status =
            StatusCode::from_u16(classified.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        tracing::warn!(
            status = status.as_u16(),
            url = self.url.as_deref().unwrap_or("-"),
            "Request failed: {}",
            self.error
        );

        let body = ErrorResponse {
            error: classified.message,
        };

        (status, axum::Json(body)).into_response()
    }
}
