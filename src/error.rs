use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use thiserror::Error;
use tracing::warn;

/// Failures while reading the record table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("malformed column `{column}`: {message}")]
    MalformedColumn {
        column: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                warn!(error = %msg, "invalid request");
                (StatusCode::BAD_REQUEST, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
