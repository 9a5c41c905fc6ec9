use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use segrank_core::error::SegRankError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Core(#[from] SegRankError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    Any(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Core(SegRankError::UnknownFeature { column }) => {
                (StatusCode::NOT_FOUND, format!("No leaderboard for '{}'", column))
            }
            AppError::Core(SegRankError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                (StatusCode::NOT_FOUND, "Leaderboard not found".to_string())
            }
            AppError::Core(e) => {
                tracing::error!("Leaderboard Error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not read leaderboard".to_string(),
                )
            }
            AppError::Validation(s) => (StatusCode::BAD_REQUEST, s),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, what),
            AppError::Any(e) => {
                tracing::error!("Internal Error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
