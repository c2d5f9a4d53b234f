use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Anything that keeps `/similarity` from producing a score.
///
/// All variants collapse into the same response shape: HTTP 500 with the
/// message and a similarity of `0`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidJson(String),
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("'lang' must be a string")]
    InvalidLang,
    #[error("similarity worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "similarity request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message, "similarity": 0 })),
        )
            .into_response()
    }
}
