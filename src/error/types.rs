use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

/// Message surfaced when an upload is requested without a validated file.
pub const NO_VALID_SELECTION_MESSAGE: &str = "Please select a valid PDF file before uploading.";

/// Faults of the service and the uploader component.
///
/// Validation failures are not errors: they travel as a
/// [`ValidationVerdict`](crate::models::ValidationVerdict).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please select a valid PDF file before uploading.")]
    NoValidSelection,

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid upload request: {message}")]
    InvalidRequest { message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NoValidSelection => "NO_VALID_SELECTION",
            AppError::MissingFile => "MISSING_FILE",
            AppError::InvalidRequest { .. } => "INVALID_REQUEST",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoValidSelection => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                request_id = %request_id,
                error_message = %message,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                request_id = %request_id,
                error_message = %message,
                "Request rejected"
            );
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

// Conversions used through `?` in the handlers
impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::InvalidRequest {
            message: format!("Failed to read multipart field: {}", err),
        }
    }
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }
}
