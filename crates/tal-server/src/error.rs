//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tal_core::TalError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by the handlers.
///
/// Client errors carry their message; everything else is logged and answered
/// with a generic 500. The body is `{"error": ..}`, or `{"ok": false, "error": ..}`
/// for endpoints whose success body also has an `ok` flag.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    ok_flag: bool,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            ok_flag: false,
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            ok_flag: false,
        }
    }

    /// Adds `"ok": false` to the response body.
    pub fn with_ok_flag(mut self) -> Self {
        self.ok_flag = true;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TalError> for AppError {
    fn from(err: TalError) -> Self {
        match err {
            TalError::Validation { message, .. } => Self::bad_request(message),
            err if err.is_client_error() => Self::bad_request(err.to_string()),
            err => {
                tracing::error!("[Server] Request failed: {}", err);
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("[Server] Rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = if self.ok_flag {
            serde_json::json!({ "ok": false, "error": self.message })
        } else {
            serde_json::json!({ "error": self.message })
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_message() {
        let err = AppError::from(TalError::validation("phone", "Phone is required"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Phone is required");
    }

    #[test]
    fn test_unexpected_errors_are_hidden() {
        let err = AppError::from(TalError::internal("database exploded"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
    }
}
