//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::TRACING_TARGET_HANDLER;
use crate::error::Error;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description.
    pub error: String,
}

/// Handler error: a crate [`Error`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET_HANDLER,
                error = %self.0,
                "Request failed"
            );
            "internal server error".to_string()
        } else {
            tracing::debug!(
                target: TRACING_TARGET_HANDLER,
                error = %self.0,
                "Rejected request"
            );
            self.0.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
