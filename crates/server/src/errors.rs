use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfinsight::InsightError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The request itself is unusable (missing file, unknown type).
    BadRequest(String),
    /// Errors originating from `pdfinsight`.
    Insight(InsightError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `InsightError` to `AppError`.
impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        AppError::Insight(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => {
                error!("Bad request: {message}");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Insight(err) => {
                // Log the original error for debugging purposes
                error!("InsightError: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
