use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Well-formed but semantically invalid input (negative or above the cap).
    #[error("{0}")]
    OutOfRange(String),
    #[error(transparent)]
    Sequence(#[from] sequence::SequenceError),
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("database capability is not configured")]
    DatabaseUnavailable,
    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `ApiError` into an HTTP response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::OutOfRange(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Sequence(seq_err) => (StatusCode::BAD_REQUEST, seq_err.to_string()),
            ApiError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("analytics storage failure: {db_err}"),
                )
            }
            ApiError::DatabaseUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "database capability is not configured".to_string(),
            ),
            ApiError::Serialization(json_err) => {
                tracing::error!(error = ?json_err, "Response encoding error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to encode response: {json_err}"),
                )
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
