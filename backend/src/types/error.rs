//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::github::GitHubError;
use crate::upload::UploadError;

/// Error envelope returned by every failing request
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
    /// Always `false` for errors
    pub ok: bool,
    /// Human-readable error message
    pub error: String,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with the given message
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 with the given message
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 405 for any method other than `POST`/`OPTIONS`
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message carried in the `error` field
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.message),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.message),
            _ => {}
        }

        let body = ErrorResponse {
            ok: false,
            error: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert input validation errors to application errors
impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        tracing::debug!("Rejected upload input: {err}");
        Self::bad_request(err.to_string())
    }
}

/// Convert GitHub errors to application errors
impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::NotConfigured(missing) => {
                tracing::error!("GitHub target not configured, missing: {missing}");
                Self::internal("Server not configured")
            }
            GitHubError::Upstream { status, message } => {
                tracing::warn!("GitHub rejected upload with status {status}: {message}");
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Self::new(status, message)
            }
            GitHubError::Transport(msg) | GitHubError::Decode(msg) => Self::internal(msg),
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorResponse>::operation_response(ctx, operation)
    }
}
